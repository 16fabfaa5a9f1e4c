mod aggregate;
mod aggregator;

pub use aggregate::{
    average, grade_average, rank, AttendanceLine, AttendanceReport, CompetitorLine,
    CompetitorReport, GeneralReport, HoursSummary, ModalityReport, ModalitySummary, RankingEntry,
    RankingReport, TrainingHoursLine, TrainingHoursReport,
};
pub use aggregator::ReportAggregator;
