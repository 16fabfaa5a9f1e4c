use anyhow::{Context, Result};
use chrono::NaiveDate;
use reqwest::Method;
use serde::Serialize;
use uuid::Uuid;

use crate::models::{
    Competitor, Enrollment, Exam, Grade, Modality, PlatformSettings, TrainingSession,
    TrainingStatus, TrainingType,
};

use super::{ApiClient, ApiError};

/// Filters for listing training sessions
#[derive(Debug, Default, Clone)]
pub struct TrainingQuery {
    pub competitor_id: Option<Uuid>,
    pub modality_id: Option<Uuid>,
    pub from: Option<NaiveDate>,
    pub to: Option<NaiveDate>,
    pub kind: Option<TrainingType>,
    pub status: Option<TrainingStatus>,
}

impl TrainingQuery {
    fn to_query(&self) -> Vec<(String, String)> {
        let mut query = Vec::new();

        if let Some(id) = self.competitor_id {
            query.push(("competitor_id".to_string(), id.to_string()));
        }
        if let Some(id) = self.modality_id {
            query.push(("modality_id".to_string(), id.to_string()));
        }
        if let Some(from) = self.from {
            query.push(("from".to_string(), from.to_string()));
        }
        if let Some(to) = self.to {
            query.push(("to".to_string(), to.to_string()));
        }
        if let Some(kind) = self.kind {
            query.push(("type".to_string(), kind.to_string()));
        }
        if let Some(status) = self.status {
            query.push(("status".to_string(), status.to_string()));
        }

        query
    }
}

/// Payload for logging a training session
#[derive(Debug, Serialize)]
pub struct CreateTrainingRequest {
    pub modality_id: Uuid,
    pub date: NaiveDate,
    pub hours: f64,
    #[serde(rename = "type")]
    pub kind: TrainingType,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

#[derive(Debug, Serialize)]
struct ValidateTrainingRequest {
    approved: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    reason: Option<String>,
}

impl ApiClient {
    /// Fetch platform branding. This endpoint is public so the login screen
    /// can brand itself before authentication.
    pub async fn get_platform_settings(&self) -> Result<PlatformSettings> {
        let url = format!("{}/platform-settings", self.base_url);

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .context("Failed to fetch platform settings")?;

        let status = response.status();

        if status.is_success() {
            response
                .json()
                .await
                .context("Failed to parse platform settings")
        } else {
            let error_text = response.text().await.unwrap_or_default();
            Err(ApiError::from_response(status, error_text).into())
        }
    }

    pub async fn list_modalities(&self, only_active: bool) -> Result<Vec<Modality>> {
        let mut query = Vec::new();
        if only_active {
            query.push(("active".to_string(), "true".to_string()));
        }

        self.fetch_all("/modalities", &query).await
    }

    pub async fn get_modality(&self, id: Uuid) -> Result<Modality> {
        self.request_json(Method::GET, &format!("/modalities/{id}"), &[], None)
            .await
    }

    pub async fn list_competitors(&self, modality_id: Option<Uuid>) -> Result<Vec<Competitor>> {
        let mut query = Vec::new();
        if let Some(id) = modality_id {
            query.push(("modality_id".to_string(), id.to_string()));
        }

        self.fetch_all("/competitors", &query).await
    }

    pub async fn get_competitor(&self, id: Uuid) -> Result<Competitor> {
        self.request_json(Method::GET, &format!("/competitors/{id}"), &[], None)
            .await
    }

    pub async fn list_enrollments(&self, modality_id: Uuid) -> Result<Vec<Enrollment>> {
        self.fetch_all(&format!("/modalities/{modality_id}/enrollments"), &[])
            .await
    }

    pub async fn list_exams(&self, modality_id: Option<Uuid>) -> Result<Vec<Exam>> {
        let mut query = Vec::new();
        if let Some(id) = modality_id {
            query.push(("modality_id".to_string(), id.to_string()));
        }

        self.fetch_all("/exams", &query).await
    }

    pub async fn list_grades(
        &self,
        competitor_id: Option<Uuid>,
        modality_id: Option<Uuid>,
    ) -> Result<Vec<Grade>> {
        let mut query = Vec::new();
        if let Some(id) = competitor_id {
            query.push(("competitor_id".to_string(), id.to_string()));
        }
        if let Some(id) = modality_id {
            query.push(("modality_id".to_string(), id.to_string()));
        }

        self.fetch_all("/grades", &query).await
    }

    pub async fn list_trainings(&self, filter: &TrainingQuery) -> Result<Vec<TrainingSession>> {
        self.fetch_all("/trainings", &filter.to_query()).await
    }

    pub async fn create_training(
        &self,
        request: &CreateTrainingRequest,
    ) -> Result<TrainingSession> {
        let body = serde_json::to_value(request).context("Failed to serialize training")?;

        self.request_json(Method::POST, "/trainings", &[], Some(&body))
            .await
    }

    /// Approve or reject a pending training session
    pub async fn validate_training(
        &self,
        id: Uuid,
        approved: bool,
        reason: Option<&str>,
    ) -> Result<TrainingSession> {
        let request = ValidateTrainingRequest {
            approved,
            reason: reason.map(String::from),
        };
        let body = serde_json::to_value(&request).context("Failed to serialize validation")?;

        self.request_json(
            Method::POST,
            &format!("/trainings/{id}/validate"),
            &[],
            Some(&body),
        )
        .await
    }
}
