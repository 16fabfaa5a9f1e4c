use anyhow::Result;
use clap::Args;
use dialoguer::{Input, Password};

use crate::api::ApiClient;
use crate::config::Config;

#[derive(Args)]
pub struct LoginCommand {}

impl LoginCommand {
    pub async fn execute(self) -> Result<()> {
        println!("Competia - Login");
        println!();

        let email: String = Input::new().with_prompt("Email").interact_text()?;
        let password = Password::new().with_prompt("Password").interact()?;

        println!();
        println!("Logging in as {}...", email);

        let config = Config::load()?;
        let client = ApiClient::new(config)?;

        match client.login(&email, &password).await {
            Ok(response) => {
                println!("✓ Login successful!");
                println!();
                println!("Welcome, {}!", response.user.email);
                println!("Role: {}", response.user.role);

                if response.user.must_change_password {
                    println!();
                    println!("Your account requires a password change on the web platform.");
                }

                Ok(())
            }
            Err(e) => {
                println!("✗ Login failed: {}", e);
                Err(e)
            }
        }
    }
}
