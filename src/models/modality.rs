use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Competition discipline owning its own set of gradeable competences
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Modality {
    pub id: Uuid,
    pub code: String,
    pub name: String,
    #[serde(default = "default_true")]
    pub active: bool,
    #[serde(default)]
    pub competences: Vec<Competence>,
}

/// Named, weighted, max-scored evaluation dimension within a modality
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Competence {
    pub id: Uuid,
    pub name: String,
    pub max_score: f64,
    #[serde(default = "default_weight")]
    pub weight: f64,
}

fn default_true() -> bool {
    true
}

fn default_weight() -> f64 {
    1.0
}
