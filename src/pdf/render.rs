use anyhow::Result;
use chrono::NaiveDate;

use crate::models::Modality;
use crate::reports::{
    AttendanceReport, CompetitorReport, GeneralReport, HoursSummary, ModalityReport,
    RankingReport, TrainingHoursReport,
};

use super::layout::format_number;
use super::{ReportDocument, Theme};

const NO_RECORDS: &str = "No records found for the selected filters.";

/// Builtin Helvetica is WinAnsi-encoded, so stick to Latin-1-safe
/// punctuation in rendered strings.
fn modality_label(modality: Option<&Modality>) -> String {
    modality
        .map(|m| format!("{} - {}", m.code, m.name))
        .unwrap_or_else(|| "All modalities".to_string())
}

fn period_label(from: Option<NaiveDate>, to: Option<NaiveDate>) -> String {
    match (from, to) {
        (Some(from), Some(to)) => format!("{from} to {to}"),
        (Some(from), None) => format!("from {from}"),
        (None, Some(to)) => format!("until {to}"),
        (None, None) => "all time".to_string(),
    }
}

fn hours_chart(doc: &mut ReportDocument, hours: &HoursSummary) {
    doc.bar_chart(
        &[
            ("Internal".to_string(), hours.internal),
            ("External".to_string(), hours.external),
            ("Approved".to_string(), hours.approved),
            ("Pending".to_string(), hours.pending),
            ("Rejected".to_string(), hours.rejected),
        ],
        Some(hours.total),
    );
}

pub fn render_competitor(report: &CompetitorReport, theme: Theme) -> Result<ReportDocument> {
    let mut doc = ReportDocument::new("Competitor Report", theme)?;

    doc.section("Competitor");
    doc.info_grid(&[
        ("Name", report.competitor.name.clone()),
        ("Modality", modality_label(report.modality.as_ref())),
        ("Sessions", report.session_count.to_string()),
        ("Grades", report.grade_count.to_string()),
        ("Average grade", format!("{:.1}", report.average_grade)),
        ("Counted hours", format_number(report.hours.counted())),
    ]);

    doc.section("Training hours");
    if report.session_count == 0 {
        doc.empty_state(NO_RECORDS);
    } else {
        hours_chart(&mut doc, &report.hours);
    }

    Ok(doc)
}

pub fn render_modality(report: &ModalityReport, theme: Theme) -> Result<ReportDocument> {
    let mut doc = ReportDocument::new("Modality Report", theme)?;

    doc.section("Overview");
    doc.info_grid(&[
        ("Modality", report.modality.name.clone()),
        ("Code", report.modality.code.clone()),
        ("Competitors", report.lines.len().to_string()),
        ("Average grade", format!("{:.1}", report.average_grade)),
    ]);

    doc.section("Competitors");
    if report.lines.is_empty() {
        doc.empty_state(NO_RECORDS);
        return Ok(doc);
    }

    let rows: Vec<Vec<String>> = report
        .lines
        .iter()
        .map(|line| {
            vec![
                line.name.clone(),
                format_number(line.hours.counted()),
                format_number(line.hours.approved),
                format!("{:.1}", line.average_grade),
                line.grade_count.to_string(),
            ]
        })
        .collect();
    doc.table(
        &["Name", "Hours", "Approved", "Average", "Grades"],
        &[0.4, 0.15, 0.15, 0.15, 0.15],
        &rows,
    );

    let graded: Vec<(String, f64)> = report
        .lines
        .iter()
        .filter(|l| l.grade_count > 0)
        .map(|l| (l.name.clone(), l.average_grade))
        .collect();
    if !graded.is_empty() {
        doc.section("Average grade per competitor");
        doc.bar_chart(&graded, None);
    }

    Ok(doc)
}

pub fn render_attendance(report: &AttendanceReport, theme: Theme) -> Result<ReportDocument> {
    let mut doc = ReportDocument::new("Attendance Report", theme)?;

    doc.section("Filters");
    doc.info_grid(&[
        ("Period", period_label(report.from, report.to)),
        (
            "Type",
            report
                .kind
                .map(|k| k.to_string())
                .unwrap_or_else(|| "all".to_string()),
        ),
    ]);

    doc.section("Attendance");
    if report.lines.is_empty() {
        doc.empty_state(NO_RECORDS);
        return Ok(doc);
    }

    let rows: Vec<Vec<String>> = report
        .lines
        .iter()
        .map(|line| {
            vec![
                line.name.clone(),
                line.sessions.to_string(),
                format_number(line.hours),
            ]
        })
        .collect();
    doc.table(&["Name", "Sessions", "Hours"], &[0.6, 0.2, 0.2], &rows);

    Ok(doc)
}

pub fn render_ranking(report: &RankingReport, theme: Theme) -> Result<ReportDocument> {
    let mut doc = ReportDocument::new("Ranking Report", theme)?;

    doc.section("Overview");
    doc.info_grid(&[
        ("Modality", report.modality.name.clone()),
        ("Code", report.modality.code.clone()),
    ]);

    doc.section("Ranking");
    if report.entries.is_empty() {
        doc.empty_state(NO_RECORDS);
        return Ok(doc);
    }

    let rows: Vec<Vec<String>> = report
        .entries
        .iter()
        .map(|entry| {
            vec![
                entry.position.to_string(),
                entry.name.clone(),
                format!("{:.1}", entry.average_grade),
                entry.grade_count.to_string(),
            ]
        })
        .collect();
    doc.table(
        &["#", "Name", "Average", "Grades"],
        &[0.1, 0.55, 0.2, 0.15],
        &rows,
    );

    let top: Vec<(String, f64)> = report
        .entries
        .iter()
        .take(10)
        .map(|e| (e.name.clone(), e.average_grade))
        .collect();
    doc.section("Top averages");
    doc.bar_chart(&top, None);

    Ok(doc)
}

pub fn render_training_hours(
    report: &TrainingHoursReport,
    theme: Theme,
) -> Result<ReportDocument> {
    let mut doc = ReportDocument::new("Training Hours Report", theme)?;

    doc.section("Filters");
    doc.info_grid(&[("Period", period_label(report.from, report.to))]);

    doc.section("Hours per competitor");
    if report.lines.is_empty() {
        doc.empty_state(NO_RECORDS);
        return Ok(doc);
    }

    let rows: Vec<Vec<String>> = report
        .lines
        .iter()
        .map(|line| {
            vec![
                line.name.clone(),
                format_number(line.hours.internal),
                format_number(line.hours.external),
                format_number(line.hours.approved),
                format_number(line.hours.pending),
                format_number(line.hours.rejected),
                format_number(line.hours.counted()),
            ]
        })
        .collect();
    doc.table(
        &[
            "Name", "Internal", "External", "Approved", "Pending", "Rejected", "Counted",
        ],
        &[0.34, 0.11, 0.11, 0.11, 0.11, 0.11, 0.11],
        &rows,
    );

    Ok(doc)
}

pub fn render_general(report: &GeneralReport, theme: Theme) -> Result<ReportDocument> {
    let mut doc = ReportDocument::new("General Report", theme)?;

    doc.section("Platform overview");
    doc.info_grid(&[
        ("Active modalities", report.modalities.len().to_string()),
        ("Platform average", format!("{:.1}", report.platform_average)),
    ]);

    doc.section("Modalities");
    if report.modalities.is_empty() {
        doc.empty_state(NO_RECORDS);
        return Ok(doc);
    }

    let rows: Vec<Vec<String>> = report
        .modalities
        .iter()
        .map(|summary| {
            vec![
                summary.modality.code.clone(),
                summary.modality.name.clone(),
                summary.competitor_count.to_string(),
                summary.exam_count.to_string(),
                format!("{:.1}", summary.average_grade),
                format_number(summary.total_hours),
            ]
        })
        .collect();
    doc.table(
        &["Code", "Name", "Competitors", "Exams", "Average", "Hours"],
        &[0.12, 0.36, 0.14, 0.1, 0.14, 0.14],
        &rows,
    );

    let averages: Vec<(String, f64)> = report
        .modalities
        .iter()
        .filter(|m| m.grade_count > 0)
        .map(|m| (m.modality.code.clone(), m.average_grade))
        .collect();
    if !averages.is_empty() {
        doc.section("Average grade per modality");
        doc.bar_chart(&averages, None);
    }

    Ok(doc)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Competitor;
    use crate::reports::{CompetitorLine, ModalityReport};
    use tempfile::tempdir;
    use uuid::Uuid;

    fn modality() -> Modality {
        Modality {
            id: Uuid::new_v4(),
            code: "WD".to_string(),
            name: "Web Development".to_string(),
            active: true,
            competences: vec![],
        }
    }

    #[test]
    fn test_modality_label_uses_winansi_safe_punctuation() {
        let m = modality();
        let label = modality_label(Some(&m));

        assert_eq!(label, "WD - Web Development");
        assert!(label.chars().all(|c| (c as u32) < 256));
        assert_eq!(modality_label(None), "All modalities");
    }

    #[test]
    fn test_render_modality_report_with_no_competitors() {
        let report = ModalityReport::new(modality(), vec![]);
        let doc = render_modality(&report, Theme::default()).unwrap();

        let dir = tempdir().unwrap();
        let path = dir.path().join("modality.pdf");
        doc.save(&path).unwrap();

        assert!(std::fs::read(&path).unwrap().starts_with(b"%PDF"));
    }

    #[test]
    fn test_render_competitor_report() {
        let report = CompetitorReport {
            competitor: Competitor {
                id: Uuid::new_v4(),
                user_id: Uuid::new_v4(),
                name: "Maria da Silva".to_string(),
                birth_date: None,
                phone: None,
                active: true,
            },
            modality: Some(modality()),
            hours: HoursSummary {
                total: 5.0,
                internal: 4.0,
                external: 1.0,
                approved: 4.0,
                pending: 1.0,
                rejected: 0.0,
            },
            average_grade: 80.0,
            grade_count: 2,
            session_count: 3,
        };

        let doc = render_competitor(&report, Theme::default()).unwrap();
        assert_eq!(doc.page_count(), 1);
    }

    #[test]
    fn test_render_ranking_paginates_large_rosters() {
        let entries = crate::reports::rank(
            (0..150)
                .map(|i| CompetitorLine {
                    competitor_id: Uuid::new_v4(),
                    name: format!("Competitor {i}"),
                    hours: HoursSummary::default(),
                    average_grade: f64::from(i % 100),
                    grade_count: 1,
                })
                .collect(),
        );
        let report = RankingReport {
            modality: modality(),
            entries,
        };

        let doc = render_ranking(&report, Theme::default()).unwrap();
        assert!(doc.page_count() > 1);
    }
}
