use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::Result;
use clap::Subcommand;
use indicatif::{ProgressBar, ProgressStyle};
use uuid::Uuid;

use crate::api::ApiClient;
use crate::config::{Config, SettingsCache};
use crate::models::{PlatformSettings, TrainingType};
use crate::pdf::{self, slugify, ReportDocument, Theme};
use crate::reports::ReportAggregator;

use super::training::parse_date;

#[derive(Subcommand)]
pub enum ReportSubcommands {
    /// Hours and grade summary for one competitor
    Competitor {
        /// Competitor id
        #[arg(long)]
        competitor: Uuid,

        /// Restrict to one modality
        #[arg(long)]
        modality: Option<Uuid>,

        /// Output directory (defaults to the current directory)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Per-competitor summary for a whole modality
    Modality {
        /// Modality id
        #[arg(long)]
        modality: Uuid,

        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Sessions and hours grouped by competitor
    Attendance {
        /// Filter from date (YYYY-MM-DD)
        #[arg(long)]
        from: Option<String>,

        /// Filter to date (YYYY-MM-DD)
        #[arg(long)]
        to: Option<String>,

        /// Filter by training type: internal or external
        #[arg(long)]
        r#type: Option<TrainingType>,

        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Competitors of a modality ranked by average grade
    Ranking {
        /// Modality id
        #[arg(long)]
        modality: Uuid,

        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Hours split by type and approval status per competitor
    TrainingHours {
        /// Filter from date (YYYY-MM-DD)
        #[arg(long)]
        from: Option<String>,

        /// Filter to date (YYYY-MM-DD)
        #[arg(long)]
        to: Option<String>,

        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Platform-wide roll-up across all active modalities
    General {
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

pub async fn run(cmd: ReportSubcommands) -> Result<()> {
    let config = Config::load()?;
    let concurrency = config.reports.fetch_concurrency;
    let configured_output = config.reports.output_dir.clone().map(PathBuf::from);

    let client = ApiClient::new(config)?;
    let aggregator = ReportAggregator::new(&client, concurrency);

    let spinner = ProgressBar::new_spinner();
    spinner.set_style(ProgressStyle::with_template("{spinner} {msg}")?);
    spinner.set_message("Fetching report data...");
    spinner.enable_steady_tick(Duration::from_millis(100));

    let theme = load_theme(&client).await;

    let (doc, filename, output) = match cmd {
        ReportSubcommands::Competitor {
            competitor,
            modality,
            output,
        } => {
            let report = aggregator.competitor_report(competitor, modality).await?;
            let filename = format!(
                "relatorio_competidor_{}.pdf",
                slugify(&report.competitor.name)
            );
            (pdf::render_competitor(&report, theme)?, filename, output)
        }
        ReportSubcommands::Modality { modality, output } => {
            let report = aggregator.modality_report(modality).await?;
            let filename = format!(
                "relatorio_modalidade_{}.pdf",
                slugify(&report.modality.code)
            );
            (pdf::render_modality(&report, theme)?, filename, output)
        }
        ReportSubcommands::Attendance {
            from,
            to,
            r#type,
            output,
        } => {
            let from = from.as_deref().map(parse_date).transpose()?;
            let to = to.as_deref().map(parse_date).transpose()?;
            let report = aggregator.attendance_report(from, to, r#type).await?;
            let filename = "relatorio_presenca.pdf".to_string();
            (pdf::render_attendance(&report, theme)?, filename, output)
        }
        ReportSubcommands::Ranking { modality, output } => {
            let report = aggregator.ranking_report(modality).await?;
            let filename = format!("relatorio_ranking_{}.pdf", slugify(&report.modality.code));
            (pdf::render_ranking(&report, theme)?, filename, output)
        }
        ReportSubcommands::TrainingHours { from, to, output } => {
            let from = from.as_deref().map(parse_date).transpose()?;
            let to = to.as_deref().map(parse_date).transpose()?;
            let report = aggregator.training_hours_report(from, to).await?;
            let filename = "relatorio_horas_treino.pdf".to_string();
            (
                pdf::render_training_hours(&report, theme)?,
                filename,
                output,
            )
        }
        ReportSubcommands::General { output } => {
            let report = aggregator.general_report().await?;
            let filename = "relatorio_geral.pdf".to_string();
            (pdf::render_general(&report, theme)?, filename, output)
        }
    };

    spinner.finish_and_clear();

    let output_dir = output
        .or(configured_output)
        .unwrap_or_else(|| PathBuf::from("."));
    let path = save_document(doc, &output_dir, &filename)?;

    println!("✓ Report saved to {}", path.display());

    Ok(())
}

fn save_document(doc: ReportDocument, output_dir: &Path, filename: &str) -> Result<PathBuf> {
    std::fs::create_dir_all(output_dir)?;
    let path = output_dir.join(filename);
    doc.save(&path)?;
    Ok(path)
}

/// Resolve branding for the document header. Settings come from the local
/// cache when fresh, otherwise from the API; every failure degrades to
/// defaults instead of blocking the report.
async fn load_theme(client: &ApiClient) -> Theme {
    let settings = match SettingsCache::load_fresh() {
        Some(settings) => settings,
        None => match client.get_platform_settings().await {
            Ok(settings) => {
                if let Err(e) = SettingsCache::store(&settings) {
                    tracing::warn!("Failed to cache platform settings: {}", e);
                }
                settings
            }
            Err(e) => {
                tracing::warn!("Using default branding, settings fetch failed: {}", e);
                PlatformSettings::default()
            }
        },
    };

    let logo = match &settings.logo_url {
        Some(url) => match client.fetch_logo(url).await {
            Ok(bytes) => Some(bytes),
            Err(e) => {
                tracing::warn!("Logo download failed, rendering without it: {}", e);
                None
            }
        },
        None => None,
    };

    Theme::from_settings(&settings, logo)
}
