mod config_cmd;
mod list;
mod login;
mod logout;
mod report;
mod training;
mod whoami;

use anyhow::Result;
use clap::{Parser, Subcommand};

pub use login::LoginCommand;
pub use logout::LogoutCommand;
pub use report::ReportSubcommands;
pub use training::TrainingSubcommands;
pub use whoami::WhoamiCommand;

#[derive(Parser)]
#[command(name = "competia")]
#[command(about = "Terminal client for the Competia training platform", long_about = None)]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Login to the platform
    Login(LoginCommand),

    /// Logout and clear the stored session
    Logout(LogoutCommand),

    /// Show current user information
    Whoami(WhoamiCommand),

    /// Log and validate training sessions
    #[command(subcommand)]
    Training(TrainingSubcommands),

    /// Browse modalities
    #[command(subcommand)]
    Modality(ModalitySubcommands),

    /// Browse competitors
    #[command(subcommand)]
    Competitor(CompetitorSubcommands),

    /// Generate PDF reports
    #[command(subcommand)]
    Report(ReportSubcommands),

    /// Manage configuration
    #[command(subcommand)]
    Config(ConfigSubcommands),

    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: clap_complete::Shell,
    },
}

#[derive(Subcommand)]
enum ModalitySubcommands {
    /// List modalities
    List {
        /// Include inactive modalities
        #[arg(short, long)]
        all: bool,
    },

    /// List enrollments for a modality
    Enrollments {
        /// Modality id
        modality: uuid::Uuid,
    },
}

#[derive(Subcommand)]
enum CompetitorSubcommands {
    /// List competitors
    List {
        /// Filter by modality id
        #[arg(short, long)]
        modality: Option<uuid::Uuid>,
    },
}

#[derive(Subcommand)]
enum ConfigSubcommands {
    /// Show current configuration
    Show,

    /// Initialize configuration with defaults
    Init {
        /// Overwrite existing config
        #[arg(short, long)]
        force: bool,
    },
}

impl Cli {
    pub async fn execute(self) -> Result<()> {
        if self.verbose {
            tracing::info!("Verbose mode enabled");
        }

        match self.command {
            Commands::Login(cmd) => cmd.execute().await,
            Commands::Logout(cmd) => cmd.execute().await,
            Commands::Whoami(cmd) => cmd.execute().await,
            Commands::Training(subcmd) => training::run(subcmd).await,
            Commands::Modality(subcmd) => match subcmd {
                ModalitySubcommands::List { all } => list::list_modalities(all).await,
                ModalitySubcommands::Enrollments { modality } => {
                    list::list_enrollments(modality).await
                }
            },
            Commands::Competitor(subcmd) => match subcmd {
                CompetitorSubcommands::List { modality } => {
                    list::list_competitors(modality).await
                }
            },
            Commands::Report(subcmd) => report::run(subcmd).await,
            Commands::Config(subcmd) => match subcmd {
                ConfigSubcommands::Show => config_cmd::show_config().await,
                ConfigSubcommands::Init { force } => config_cmd::init_config(force).await,
            },
            Commands::Completions { shell } => {
                generate_completions(shell);
                Ok(())
            }
        }
    }
}

fn generate_completions(shell: clap_complete::Shell) {
    use clap::CommandFactory;
    use clap_complete::generate;
    use std::io;

    let mut cmd = Cli::command();
    let name = cmd.get_name().to_string();
    generate(shell, &mut cmd, name, &mut io::stdout());
}
