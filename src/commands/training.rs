use anyhow::{Context, Result};
use chrono::NaiveDate;
use clap::Subcommand;
use colored::Colorize;
use uuid::Uuid;

use crate::api::{ApiClient, CreateTrainingRequest, TrainingQuery};
use crate::config::Config;
use crate::models::{TrainingStatus, TrainingType};

#[derive(Subcommand)]
pub enum TrainingSubcommands {
    /// Log a new training session
    Log {
        /// Modality id
        #[arg(long)]
        modality: Uuid,

        /// Session date (YYYY-MM-DD)
        #[arg(long)]
        date: String,

        /// Hours trained
        #[arg(long)]
        hours: f64,

        /// Session type: internal or external
        #[arg(long, default_value = "internal")]
        r#type: TrainingType,

        /// Free-form notes
        #[arg(long)]
        notes: Option<String>,
    },

    /// List training sessions
    List {
        /// Filter by competitor id
        #[arg(long)]
        competitor: Option<Uuid>,

        /// Filter by modality id
        #[arg(long)]
        modality: Option<Uuid>,

        /// Filter from date (YYYY-MM-DD)
        #[arg(long)]
        from: Option<String>,

        /// Filter to date (YYYY-MM-DD)
        #[arg(long)]
        to: Option<String>,

        /// Number of sessions to show
        #[arg(short, long, default_value = "20")]
        limit: usize,
    },

    /// Approve or reject a pending session (evaluators only)
    Validate {
        /// Training session id
        id: Uuid,

        /// Approve the session
        #[arg(long, conflicts_with = "reject")]
        approve: bool,

        /// Reject the session
        #[arg(long)]
        reject: bool,

        /// Reason for rejection
        #[arg(long, requires = "reject")]
        reason: Option<String>,
    },
}

pub async fn run(cmd: TrainingSubcommands) -> Result<()> {
    match cmd {
        TrainingSubcommands::Log {
            modality,
            date,
            hours,
            r#type,
            notes,
        } => log_training(modality, &date, hours, r#type, notes).await,
        TrainingSubcommands::List {
            competitor,
            modality,
            from,
            to,
            limit,
        } => list_trainings(competitor, modality, from, to, limit).await,
        TrainingSubcommands::Validate {
            id,
            approve,
            reject,
            reason,
        } => validate_training(id, approve, reject, reason).await,
    }
}

pub(crate) fn parse_date(value: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .with_context(|| format!("Invalid date '{value}', expected YYYY-MM-DD"))
}

fn status_label(status: TrainingStatus) -> colored::ColoredString {
    match status {
        TrainingStatus::Approved => "approved".green(),
        TrainingStatus::Pending => "pending".yellow(),
        TrainingStatus::Rejected => "rejected".red(),
    }
}

async fn log_training(
    modality: Uuid,
    date: &str,
    hours: f64,
    kind: TrainingType,
    notes: Option<String>,
) -> Result<()> {
    if hours <= 0.0 {
        anyhow::bail!("Hours must be greater than zero");
    }

    let date = parse_date(date)?;

    let config = Config::load()?;
    let client = ApiClient::new(config)?;

    let request = CreateTrainingRequest {
        modality_id: modality,
        date,
        hours,
        kind,
        notes,
    };

    let session = client.create_training(&request).await?;

    println!("✓ Training logged!");
    println!();
    println!("  Date:   {}", session.date);
    println!("  Hours:  {}", session.hours);
    println!("  Type:   {}", session.kind);
    println!("  Status: {}", status_label(session.status));

    Ok(())
}

async fn list_trainings(
    competitor: Option<Uuid>,
    modality: Option<Uuid>,
    from: Option<String>,
    to: Option<String>,
    limit: usize,
) -> Result<()> {
    let config = Config::load()?;
    let client = ApiClient::new(config)?;

    let query = TrainingQuery {
        competitor_id: competitor,
        modality_id: modality,
        from: from.as_deref().map(parse_date).transpose()?,
        to: to.as_deref().map(parse_date).transpose()?,
        ..Default::default()
    };

    let sessions = client.list_trainings(&query).await?;

    if sessions.is_empty() {
        println!("No training sessions found.");
        return Ok(());
    }

    println!(
        "{:<38} {:<12} {:>6}  {:<8}  {}",
        "ID", "Date", "Hours", "Type", "Status"
    );

    for session in sessions.iter().take(limit) {
        println!(
            "{:<38} {:<12} {:>6}  {:<8}  {}",
            session.id,
            session.date.to_string(),
            session.hours,
            session.kind.to_string(),
            status_label(session.status)
        );

        if let Some(reason) = &session.rejection_reason {
            println!("{:>52}  reason: {}", "", reason.dimmed());
        }
    }

    if sessions.len() > limit {
        println!();
        println!("... and {} more", sessions.len() - limit);
    }

    Ok(())
}

async fn validate_training(
    id: Uuid,
    approve: bool,
    reject: bool,
    reason: Option<String>,
) -> Result<()> {
    if approve == reject {
        anyhow::bail!("Pass exactly one of --approve or --reject");
    }

    let config = Config::load()?;
    let client = ApiClient::new(config)?;

    let session = client
        .validate_training(id, approve, reason.as_deref())
        .await?;

    println!(
        "✓ Session {} is now {}",
        session.id,
        status_label(session.status)
    );

    Ok(())
}
