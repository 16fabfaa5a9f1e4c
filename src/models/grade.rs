use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Single competence score for one competitor on one exam
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Grade {
    pub id: Uuid,
    pub exam_id: Uuid,
    pub competitor_id: Uuid,
    pub competence_id: Uuid,
    pub score: f64,
    #[serde(default)]
    pub graded_by: Option<Uuid>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
}
