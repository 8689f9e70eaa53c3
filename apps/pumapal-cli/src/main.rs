mod cli;
mod client;
mod commands;
mod filter;
mod view;

use clap::Parser;
use pumapal_config::ProfileConfig;

use cli::{Cli, Command, ProfileCommand};
use commands::*;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let profile_path = ProfileConfig::default_path();
    let profile = ProfileConfig::load_or_default(&profile_path)?;
    let server = cli
        .server
        .clone()
        .unwrap_or_else(|| profile.server_url().to_string());

    match cli.command {
        Command::Search { course, filter } => {
            cmd_search(&server, &profile, &course, filter.into()).await?;
        }
        Command::List { filter } => {
            cmd_list(&server, &profile, filter.into()).await?;
        }
        Command::Show { id } => {
            cmd_show(&server, &profile, &id).await?;
        }
        Command::Create(args) => {
            cmd_create(&server, &profile, args).await?;
        }
        Command::Join { id, identity } => {
            cmd_join(&server, &profile, &id, identity).await?;
        }
        Command::Leave { id, email } => {
            cmd_leave(&server, &profile, &id, email.as_deref()).await?;
        }
        Command::Edit(args) => {
            cmd_edit(&server, &profile, args).await?;
        }
        Command::Delete { id, email } => {
            cmd_delete(&server, &profile, &id, email.as_deref()).await?;
        }
        Command::Profile { profile_cmd } => match profile_cmd {
            ProfileCommand::Set {
                name,
                email,
                server,
            } => {
                cmd_profile_set(
                    &profile_path,
                    name.as_deref(),
                    email.as_deref(),
                    server.as_deref(),
                )?;
            }
            ProfileCommand::Show => {
                cmd_profile_show(&profile_path)?;
            }
        },
    }

    Ok(())
}
