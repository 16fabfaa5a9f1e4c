use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Binding between a competitor, a modality and an optional responsible evaluator
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Enrollment {
    pub id: Uuid,
    pub competitor_id: Uuid,
    pub modality_id: Uuid,
    #[serde(default)]
    pub evaluator_id: Option<Uuid>,
    #[serde(default)]
    pub status: EnrollmentStatus,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EnrollmentStatus {
    #[default]
    Active,
    Suspended,
    Completed,
}
