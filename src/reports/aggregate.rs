use chrono::NaiveDate;
use serde::Serialize;
use uuid::Uuid;

use crate::models::{
    Competitor, Grade, Modality, TrainingSession, TrainingStatus, TrainingType,
};

/// Average of a score list. An empty list averages to 0, never NaN.
pub fn average(scores: &[f64]) -> f64 {
    if scores.is_empty() {
        return 0.0;
    }
    scores.iter().sum::<f64>() / scores.len() as f64
}

/// Hour totals split by training type and approval status.
///
/// Both splits partition the same total: `internal + external == total` and
/// `approved + pending + rejected == total`. The summary view reports
/// `counted()` hours, which exclude rejected sessions.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct HoursSummary {
    pub total: f64,
    pub internal: f64,
    pub external: f64,
    pub approved: f64,
    pub pending: f64,
    pub rejected: f64,
}

impl HoursSummary {
    pub fn from_sessions(sessions: &[TrainingSession]) -> Self {
        let mut summary = Self::default();

        for session in sessions {
            summary.total += session.hours;

            match session.kind {
                TrainingType::Internal => summary.internal += session.hours,
                TrainingType::External => summary.external += session.hours,
            }

            match session.status {
                TrainingStatus::Approved => summary.approved += session.hours,
                TrainingStatus::Pending => summary.pending += session.hours,
                TrainingStatus::Rejected => summary.rejected += session.hours,
            }
        }

        summary
    }

    /// Hours that count toward the competitor's log (rejected excluded)
    pub fn counted(&self) -> f64 {
        self.total - self.rejected
    }
}

/// Reduce a grade list to (average, count)
pub fn grade_average(grades: &[Grade]) -> (f64, usize) {
    let scores: Vec<f64> = grades.iter().map(|g| g.score).collect();
    (average(&scores), scores.len())
}

/// Aggregate for a single competitor's report
#[derive(Debug, Clone, Serialize)]
pub struct CompetitorReport {
    pub competitor: Competitor,
    pub modality: Option<Modality>,
    pub hours: HoursSummary,
    pub average_grade: f64,
    pub grade_count: usize,
    pub session_count: usize,
}

/// Per-competitor line inside modality-level reports
#[derive(Debug, Clone, Serialize)]
pub struct CompetitorLine {
    pub competitor_id: Uuid,
    pub name: String,
    pub hours: HoursSummary,
    pub average_grade: f64,
    pub grade_count: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct ModalityReport {
    pub modality: Modality,
    pub lines: Vec<CompetitorLine>,
    /// Equal-weight mean over competitors with at least one grade
    pub average_grade: f64,
}

impl ModalityReport {
    pub fn new(modality: Modality, lines: Vec<CompetitorLine>) -> Self {
        let averages: Vec<f64> = lines
            .iter()
            .filter(|l| l.grade_count > 0)
            .map(|l| l.average_grade)
            .collect();
        let average_grade = average(&averages);

        Self {
            modality,
            lines,
            average_grade,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct AttendanceLine {
    pub competitor_id: Uuid,
    pub name: String,
    pub sessions: usize,
    pub hours: f64,
}

#[derive(Debug, Clone, Serialize)]
pub struct AttendanceReport {
    pub from: Option<NaiveDate>,
    pub to: Option<NaiveDate>,
    pub kind: Option<TrainingType>,
    pub lines: Vec<AttendanceLine>,
}

#[derive(Debug, Clone, Serialize)]
pub struct RankingEntry {
    pub position: usize,
    pub competitor_id: Uuid,
    pub name: String,
    pub average_grade: f64,
    pub grade_count: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct RankingReport {
    pub modality: Modality,
    pub entries: Vec<RankingEntry>,
}

/// Sort lines by average grade descending and assign 1-based positions.
/// The sort is stable, so ties keep their original fetch order.
pub fn rank(lines: Vec<CompetitorLine>) -> Vec<RankingEntry> {
    let mut lines = lines;
    lines.sort_by(|a, b| {
        b.average_grade
            .partial_cmp(&a.average_grade)
            .unwrap_or(std::cmp::Ordering::Equal)
    });

    lines
        .into_iter()
        .enumerate()
        .map(|(i, line)| RankingEntry {
            position: i + 1,
            competitor_id: line.competitor_id,
            name: line.name,
            average_grade: line.average_grade,
            grade_count: line.grade_count,
        })
        .collect()
}

#[derive(Debug, Clone, Serialize)]
pub struct TrainingHoursLine {
    pub competitor_id: Uuid,
    pub name: String,
    pub hours: HoursSummary,
}

#[derive(Debug, Clone, Serialize)]
pub struct TrainingHoursReport {
    pub from: Option<NaiveDate>,
    pub to: Option<NaiveDate>,
    pub lines: Vec<TrainingHoursLine>,
}

/// Per-modality roll-up inside the general report
#[derive(Debug, Clone, Serialize)]
pub struct ModalitySummary {
    pub modality: Modality,
    pub competitor_count: usize,
    pub exam_count: usize,
    pub average_grade: f64,
    pub grade_count: usize,
    pub total_hours: f64,
}

#[derive(Debug, Clone, Serialize)]
pub struct GeneralReport {
    pub modalities: Vec<ModalitySummary>,
    /// Equal-weight mean of each modality's own average
    pub platform_average: f64,
}

impl GeneralReport {
    pub fn new(modalities: Vec<ModalitySummary>) -> Self {
        let averages: Vec<f64> = modalities
            .iter()
            .filter(|m| m.grade_count > 0)
            .map(|m| m.average_grade)
            .collect();
        let platform_average = average(&averages);

        Self {
            modalities,
            platform_average,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn session(hours: f64, kind: TrainingType, status: TrainingStatus) -> TrainingSession {
        TrainingSession {
            id: Uuid::new_v4(),
            competitor_id: Uuid::new_v4(),
            modality_id: Uuid::new_v4(),
            date: NaiveDate::from_ymd_opt(2026, 5, 1).unwrap(),
            hours,
            kind,
            status,
            rejection_reason: None,
            notes: None,
        }
    }

    fn grade(score: f64) -> Grade {
        Grade {
            id: Uuid::new_v4(),
            exam_id: Uuid::new_v4(),
            competitor_id: Uuid::new_v4(),
            competence_id: Uuid::new_v4(),
            score,
            graded_by: None,
            created_at: None,
            updated_at: None,
        }
    }

    fn line(name: &str, average_grade: f64, grade_count: usize) -> CompetitorLine {
        CompetitorLine {
            competitor_id: Uuid::new_v4(),
            name: name.to_string(),
            hours: HoursSummary::default(),
            average_grade,
            grade_count,
        }
    }

    #[test]
    fn test_average_of_empty_list_is_zero() {
        assert_eq!(average(&[]), 0.0);
    }

    #[test]
    fn test_average() {
        assert_eq!(average(&[70.0, 90.0]), 80.0);
    }

    #[test]
    fn test_hours_summary_scenario() {
        // 2 internal approved 2h each, 1 external pending 1h
        let sessions = vec![
            session(2.0, TrainingType::Internal, TrainingStatus::Approved),
            session(2.0, TrainingType::Internal, TrainingStatus::Approved),
            session(1.0, TrainingType::External, TrainingStatus::Pending),
        ];

        let summary = HoursSummary::from_sessions(&sessions);
        assert_eq!(summary.internal, 4.0);
        assert_eq!(summary.external, 1.0);
        assert_eq!(summary.approved, 4.0);
        assert_eq!(summary.pending, 1.0);
        assert_eq!(summary.total, 5.0);
    }

    #[test]
    fn test_hours_summary_partitions() {
        let sessions = vec![
            session(3.0, TrainingType::Internal, TrainingStatus::Approved),
            session(1.5, TrainingType::External, TrainingStatus::Pending),
            session(2.0, TrainingType::External, TrainingStatus::Rejected),
        ];

        let summary = HoursSummary::from_sessions(&sessions);
        assert_eq!(summary.internal + summary.external, summary.total);
        assert!(summary.approved + summary.pending + summary.rejected <= summary.total);
        assert_eq!(summary.counted(), 4.5);
    }

    #[test]
    fn test_grade_average_scenario() {
        let grades = vec![grade(70.0), grade(90.0)];
        let (avg, count) = grade_average(&grades);
        assert_eq!(avg, 80.0);
        assert_eq!(count, 2);
    }

    #[test]
    fn test_ranking_order_and_positions() {
        let entries = rank(vec![
            line("a", 80.0, 3),
            line("b", 95.0, 2),
            line("c", 60.0, 1),
        ]);

        let averages: Vec<f64> = entries.iter().map(|e| e.average_grade).collect();
        let positions: Vec<usize> = entries.iter().map(|e| e.position).collect();

        assert_eq!(averages, vec![95.0, 80.0, 60.0]);
        assert_eq!(positions, vec![1, 2, 3]);
    }

    #[test]
    fn test_ranking_ties_keep_fetch_order() {
        let entries = rank(vec![
            line("first", 75.0, 1),
            line("second", 75.0, 1),
            line("top", 90.0, 1),
        ]);

        assert_eq!(entries[0].name, "top");
        assert_eq!(entries[1].name, "first");
        assert_eq!(entries[2].name, "second");
    }

    #[test]
    fn test_modality_average_skips_ungraded_competitors() {
        let modality = Modality {
            id: Uuid::new_v4(),
            code: "WD".to_string(),
            name: "Web Development".to_string(),
            active: true,
            competences: vec![],
        };

        let report = ModalityReport::new(
            modality,
            vec![line("a", 80.0, 2), line("b", 0.0, 0), line("c", 60.0, 1)],
        );

        // b has no grades and must not drag the mean down
        assert_eq!(report.average_grade, 70.0);
        assert_eq!(report.lines.len(), 3);
    }

    #[test]
    fn test_general_report_platform_average() {
        let modality = |code: &str| Modality {
            id: Uuid::new_v4(),
            code: code.to_string(),
            name: code.to_string(),
            active: true,
            competences: vec![],
        };
        let summary = |code: &str, avg: f64, count: usize| ModalitySummary {
            modality: modality(code),
            competitor_count: 1,
            exam_count: 1,
            average_grade: avg,
            grade_count: count,
            total_hours: 0.0,
        };

        let report = GeneralReport::new(vec![
            summary("a", 90.0, 5),
            summary("b", 70.0, 2),
            summary("c", 0.0, 0),
        ]);

        assert_eq!(report.platform_average, 80.0);
    }
}
