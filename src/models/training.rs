use std::fmt;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Logged practice session with an approval workflow
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrainingSession {
    pub id: Uuid,
    pub competitor_id: Uuid,
    pub modality_id: Uuid,
    pub date: NaiveDate,
    pub hours: f64,
    #[serde(rename = "type")]
    pub kind: TrainingType,
    #[serde(default)]
    pub status: TrainingStatus,
    #[serde(default)]
    pub rejection_reason: Option<String>,
    #[serde(default)]
    pub notes: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TrainingType {
    Internal,
    External,
}

impl fmt::Display for TrainingType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TrainingType::Internal => write!(f, "internal"),
            TrainingType::External => write!(f, "external"),
        }
    }
}

impl std::str::FromStr for TrainingType {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "internal" => Ok(TrainingType::Internal),
            "external" => Ok(TrainingType::External),
            other => Err(anyhow::anyhow!(
                "Invalid training type '{}', expected 'internal' or 'external'",
                other
            )),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TrainingStatus {
    #[default]
    Pending,
    Approved,
    Rejected,
}

impl fmt::Display for TrainingStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TrainingStatus::Pending => write!(f, "pending"),
            TrainingStatus::Approved => write!(f, "approved"),
            TrainingStatus::Rejected => write!(f, "rejected"),
        }
    }
}
