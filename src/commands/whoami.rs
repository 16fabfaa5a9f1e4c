use anyhow::Result;
use clap::Args;

use crate::api::ApiClient;
use crate::config::Config;

#[derive(Args)]
pub struct WhoamiCommand {}

impl WhoamiCommand {
    pub async fn execute(self) -> Result<()> {
        let config = Config::load()?;

        if !config.is_authenticated() {
            println!("You are not logged in.");
            println!();
            println!("Use 'competia login' to authenticate.");
            return Ok(());
        }

        let client = ApiClient::new(config)?;

        match client.me().await {
            Ok(user) => {
                println!("✓ Authenticated as:");
                println!();
                println!("  Email:   {}", user.email);
                println!("  Role:    {}", user.role);
                println!("  User ID: {}", user.id);

                Ok(())
            }
            Err(e) => {
                println!("✗ Failed to fetch user information: {}", e);
                println!();
                println!("Your session may have expired.");
                println!("Use 'competia login' to authenticate again.");
                Err(e)
            }
        }
    }
}
