use std::collections::HashMap;

use anyhow::Result;
use chrono::NaiveDate;
use futures::stream::{self, StreamExt};
use uuid::Uuid;

use crate::api::{ApiClient, TrainingQuery};
use crate::models::{Competitor, Modality, TrainingSession, TrainingType};

use super::aggregate::{
    grade_average, rank, AttendanceLine, AttendanceReport, CompetitorLine, CompetitorReport,
    GeneralReport, HoursSummary, ModalityReport, ModalitySummary, RankingReport,
    TrainingHoursLine, TrainingHoursReport,
};

/// Joins paginated resource fetches into flat report aggregates.
///
/// Per-competitor fetches fan out through a bounded-concurrency stream that
/// preserves input order, so reruns against unchanged data yield identical
/// aggregates. A failed sub-fetch contributes zeros for that entity; only
/// top-level fetches (the competitor or modality list itself) fail the
/// whole report.
pub struct ReportAggregator<'a> {
    client: &'a ApiClient,
    concurrency: usize,
}

impl<'a> ReportAggregator<'a> {
    pub fn new(client: &'a ApiClient, concurrency: usize) -> Self {
        Self {
            client,
            concurrency: concurrency.max(1),
        }
    }

    pub async fn competitor_report(
        &self,
        competitor_id: Uuid,
        modality_id: Option<Uuid>,
    ) -> Result<CompetitorReport> {
        let competitor = self.client.get_competitor(competitor_id).await?;

        let modality = match modality_id {
            Some(id) => Some(self.client.get_modality(id).await?),
            None => None,
        };

        let trainings = self.trainings_or_empty(competitor_id, modality_id).await;
        let grades = self.grades_or_empty(competitor_id, modality_id).await;

        let (average_grade, grade_count) = grade_average(&grades);

        Ok(CompetitorReport {
            competitor,
            modality,
            hours: HoursSummary::from_sessions(&trainings),
            average_grade,
            grade_count,
            session_count: trainings.len(),
        })
    }

    pub async fn modality_report(&self, modality_id: Uuid) -> Result<ModalityReport> {
        let modality = self.client.get_modality(modality_id).await?;
        let lines = self.competitor_lines(modality_id).await?;

        Ok(ModalityReport::new(modality, lines))
    }

    pub async fn ranking_report(&self, modality_id: Uuid) -> Result<RankingReport> {
        let modality = self.client.get_modality(modality_id).await?;
        let lines = self.competitor_lines(modality_id).await?;

        Ok(RankingReport {
            modality,
            entries: rank(lines),
        })
    }

    pub async fn attendance_report(
        &self,
        from: Option<NaiveDate>,
        to: Option<NaiveDate>,
        kind: Option<TrainingType>,
    ) -> Result<AttendanceReport> {
        let query = TrainingQuery {
            from,
            to,
            kind,
            ..Default::default()
        };
        let trainings = self.client.list_trainings(&query).await?;
        let names = self.competitor_names().await?;

        let lines = group_by_competitor(&trainings)
            .into_iter()
            .map(|(competitor_id, sessions)| AttendanceLine {
                competitor_id,
                name: display_name(&names, competitor_id),
                sessions: sessions.len(),
                hours: sessions.iter().map(|s| s.hours).sum(),
            })
            .collect();

        Ok(AttendanceReport {
            from,
            to,
            kind,
            lines,
        })
    }

    pub async fn training_hours_report(
        &self,
        from: Option<NaiveDate>,
        to: Option<NaiveDate>,
    ) -> Result<TrainingHoursReport> {
        let query = TrainingQuery {
            from,
            to,
            ..Default::default()
        };
        let trainings = self.client.list_trainings(&query).await?;
        let names = self.competitor_names().await?;

        let lines = group_by_competitor(&trainings)
            .into_iter()
            .map(|(competitor_id, sessions)| TrainingHoursLine {
                competitor_id,
                name: display_name(&names, competitor_id),
                hours: HoursSummary::from_sessions(&sessions),
            })
            .collect();

        Ok(TrainingHoursReport { from, to, lines })
    }

    pub async fn general_report(&self) -> Result<GeneralReport> {
        let modalities = self.client.list_modalities(true).await?;

        let summaries: Vec<ModalitySummary> = stream::iter(modalities)
            .map(|modality| self.modality_summary(modality))
            .buffered(self.concurrency)
            .collect()
            .await;

        Ok(GeneralReport::new(summaries))
    }

    /// One line per competitor of a modality, fanned out with bounded
    /// concurrency in stable order.
    async fn competitor_lines(&self, modality_id: Uuid) -> Result<Vec<CompetitorLine>> {
        let competitors = self.client.list_competitors(Some(modality_id)).await?;

        let lines = stream::iter(competitors)
            .map(|competitor| self.competitor_line(competitor, modality_id))
            .buffered(self.concurrency)
            .collect()
            .await;

        Ok(lines)
    }

    async fn competitor_line(&self, competitor: Competitor, modality_id: Uuid) -> CompetitorLine {
        let grades = self.grades_or_empty(competitor.id, Some(modality_id)).await;
        let trainings = self
            .trainings_or_empty(competitor.id, Some(modality_id))
            .await;

        let (average_grade, grade_count) = grade_average(&grades);

        CompetitorLine {
            competitor_id: competitor.id,
            name: competitor.name,
            hours: HoursSummary::from_sessions(&trainings),
            average_grade,
            grade_count,
        }
    }

    async fn modality_summary(&self, modality: Modality) -> ModalitySummary {
        let modality_id = modality.id;

        let competitor_count = match self.client.list_competitors(Some(modality_id)).await {
            Ok(competitors) => competitors.len(),
            Err(e) => {
                tracing::warn!(%modality_id, "Competitor fetch failed: {}", e);
                0
            }
        };

        let exam_count = match self.client.list_exams(Some(modality_id)).await {
            Ok(exams) => exams.len(),
            Err(e) => {
                tracing::warn!(%modality_id, "Exam fetch failed: {}", e);
                0
            }
        };

        let grades = match self.client.list_grades(None, Some(modality_id)).await {
            Ok(grades) => grades,
            Err(e) => {
                tracing::warn!(%modality_id, "Grade fetch failed: {}", e);
                Vec::new()
            }
        };
        let (average_grade, grade_count) = grade_average(&grades);

        let total_hours = self
            .trainings_for_modality(modality_id)
            .await
            .iter()
            .map(|s| s.hours)
            .sum();

        ModalitySummary {
            modality,
            competitor_count,
            exam_count,
            average_grade,
            grade_count,
            total_hours,
        }
    }

    async fn grades_or_empty(
        &self,
        competitor_id: Uuid,
        modality_id: Option<Uuid>,
    ) -> Vec<crate::models::Grade> {
        match self.client.list_grades(Some(competitor_id), modality_id).await {
            Ok(grades) => grades,
            Err(e) => {
                tracing::warn!(%competitor_id, "Grade fetch failed, counting zero: {}", e);
                Vec::new()
            }
        }
    }

    async fn trainings_or_empty(
        &self,
        competitor_id: Uuid,
        modality_id: Option<Uuid>,
    ) -> Vec<TrainingSession> {
        let query = TrainingQuery {
            competitor_id: Some(competitor_id),
            modality_id,
            ..Default::default()
        };

        match self.client.list_trainings(&query).await {
            Ok(trainings) => trainings,
            Err(e) => {
                tracing::warn!(%competitor_id, "Training fetch failed, counting zero: {}", e);
                Vec::new()
            }
        }
    }

    async fn trainings_for_modality(&self, modality_id: Uuid) -> Vec<TrainingSession> {
        let query = TrainingQuery {
            modality_id: Some(modality_id),
            ..Default::default()
        };

        match self.client.list_trainings(&query).await {
            Ok(trainings) => trainings,
            Err(e) => {
                tracing::warn!(%modality_id, "Training fetch failed, counting zero: {}", e);
                Vec::new()
            }
        }
    }

    async fn competitor_names(&self) -> Result<HashMap<Uuid, String>> {
        let competitors = self.client.list_competitors(None).await?;
        Ok(competitors.into_iter().map(|c| (c.id, c.name)).collect())
    }
}

fn display_name(names: &HashMap<Uuid, String>, competitor_id: Uuid) -> String {
    names
        .get(&competitor_id)
        .cloned()
        .unwrap_or_else(|| competitor_id.to_string())
}

/// Group sessions by competitor, preserving first-appearance order so the
/// output is deterministic for a given fetch.
fn group_by_competitor(sessions: &[TrainingSession]) -> Vec<(Uuid, Vec<TrainingSession>)> {
    let mut order: Vec<Uuid> = Vec::new();
    let mut groups: HashMap<Uuid, Vec<TrainingSession>> = HashMap::new();

    for session in sessions {
        let entry = groups.entry(session.competitor_id).or_insert_with(|| {
            order.push(session.competitor_id);
            Vec::new()
        });
        entry.push(session.clone());
    }

    order
        .into_iter()
        .filter_map(|id| groups.remove(&id).map(|sessions| (id, sessions)))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{TrainingStatus, TrainingType};

    fn session(competitor_id: Uuid, hours: f64) -> TrainingSession {
        TrainingSession {
            id: Uuid::new_v4(),
            competitor_id,
            modality_id: Uuid::new_v4(),
            date: NaiveDate::from_ymd_opt(2026, 4, 2).unwrap(),
            hours,
            kind: TrainingType::Internal,
            status: TrainingStatus::Approved,
            rejection_reason: None,
            notes: None,
        }
    }

    #[test]
    fn test_group_by_competitor_preserves_first_appearance_order() {
        let a = Uuid::new_v4();
        let b = Uuid::new_v4();

        let sessions = vec![session(b, 1.0), session(a, 2.0), session(b, 3.0)];
        let groups = group_by_competitor(&sessions);

        assert_eq!(groups.len(), 2);
        assert_eq!(groups[0].0, b);
        assert_eq!(groups[0].1.len(), 2);
        assert_eq!(groups[1].0, a);
    }
}
