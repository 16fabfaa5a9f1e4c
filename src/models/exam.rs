use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Scheduled assessment evaluating a subset of a modality's competences
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Exam {
    pub id: Uuid,
    pub modality_id: Uuid,
    pub assessment_type: AssessmentType,
    pub date: NaiveDate,
    #[serde(default)]
    pub competence_ids: Vec<Uuid>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AssessmentType {
    Diagnostic,
    Mock,
    Official,
}
