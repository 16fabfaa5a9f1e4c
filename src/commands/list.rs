use anyhow::Result;
use colored::Colorize;
use uuid::Uuid;

use crate::api::ApiClient;
use crate::config::Config;
use crate::models::EnrollmentStatus;

pub async fn list_modalities(all: bool) -> Result<()> {
    let config = Config::load()?;
    let client = ApiClient::new(config)?;

    let modalities = client.list_modalities(!all).await?;

    if modalities.is_empty() {
        println!("No modalities found.");
        return Ok(());
    }

    println!("{:<38} {:<10} {:<30} {}", "ID", "Code", "Name", "Status");

    for modality in &modalities {
        let status = if modality.active {
            "active".green()
        } else {
            "inactive".dimmed()
        };
        println!(
            "{:<38} {:<10} {:<30} {}",
            modality.id, modality.code, modality.name, status
        );
    }

    Ok(())
}

pub async fn list_competitors(modality: Option<Uuid>) -> Result<()> {
    let config = Config::load()?;
    let client = ApiClient::new(config)?;

    let competitors = client.list_competitors(modality).await?;

    if competitors.is_empty() {
        println!("No competitors found.");
        return Ok(());
    }

    println!("{:<38} {:<30} {}", "ID", "Name", "Status");

    for competitor in &competitors {
        let status = if competitor.active {
            "active".green()
        } else {
            "inactive".dimmed()
        };
        println!("{:<38} {:<30} {}", competitor.id, competitor.name, status);
    }

    Ok(())
}

pub async fn list_enrollments(modality: Uuid) -> Result<()> {
    let config = Config::load()?;
    let client = ApiClient::new(config)?;

    let enrollments = client.list_enrollments(modality).await?;

    if enrollments.is_empty() {
        println!("No enrollments found.");
        return Ok(());
    }

    println!("{:<38} {:<38} {}", "Competitor", "Evaluator", "Status");

    for enrollment in &enrollments {
        let evaluator = enrollment
            .evaluator_id
            .map(|id| id.to_string())
            .unwrap_or_else(|| "-".to_string());
        let status = match enrollment.status {
            EnrollmentStatus::Active => "active".green(),
            EnrollmentStatus::Suspended => "suspended".yellow(),
            EnrollmentStatus::Completed => "completed".dimmed(),
        };
        println!(
            "{:<38} {:<38} {}",
            enrollment.competitor_id, evaluator, status
        );
    }

    Ok(())
}
