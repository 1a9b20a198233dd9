//! linkdeck CLI
//!
//! Command-line dashboard for a linkdeck profile: edit settings, links and
//! social links, with every change saved through the core sync layer.

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use linkdeck_core::{Config, LinkId};

mod commands;
mod dashboard;
mod output;

use dashboard::Dashboard;
use output::{Output, OutputFormat};

#[derive(Parser)]
#[command(name = "linkdeck")]
#[command(about = "linkdeck - Manage your link-in-bio page")]
#[command(version)]
#[command(propagate_version = true)]
struct Cli {
    /// Output as JSON
    #[arg(long, global = true)]
    json: bool,

    /// Quiet mode - minimal output
    #[arg(short, long, global = true)]
    quiet: bool,

    /// Log sync activity to stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show connection and content summary
    Status,
    /// Show or edit profile settings
    Profile {
        #[command(subcommand)]
        command: Option<ProfileCommands>,
    },
    /// Manage links
    Link {
        #[command(subcommand)]
        command: LinkCommands,
    },
    /// Manage social links
    Social {
        #[command(subcommand)]
        command: SocialCommands,
    },
    /// Show or set configuration
    Config {
        #[command(subcommand)]
        command: Option<ConfigCommands>,
    },
}

#[derive(Subcommand)]
enum ProfileCommands {
    /// Show profile, theme and preferences
    Show,
    /// Set a profile field
    Set {
        /// Field name (display_name, username, bio, theme, button_style, ...)
        field: String,
        /// New value ("none" clears profile_image)
        value: String,
    },
}

#[derive(Subcommand)]
enum LinkCommands {
    /// List all links
    #[command(alias = "ls")]
    List,
    /// Show link details
    Show {
        id: LinkId,
    },
    /// Create a new link
    #[command(alias = "create")]
    Add {
        title: String,
        url: String,
    },
    /// Change a link's title or URL
    Edit {
        id: LinkId,
        #[arg(short, long)]
        title: Option<String>,
        #[arg(short, long)]
        url: Option<String>,
    },
    /// Delete a link
    #[command(alias = "rm")]
    Delete {
        id: LinkId,
    },
    /// Show or hide a link
    Toggle {
        id: LinkId,
    },
    /// Mark or unmark a link as favorite
    Favorite {
        id: LinkId,
    },
    /// Move a link to a position (1 is first)
    Move {
        id: LinkId,
        position: usize,
    },
    /// Set when a link is visible; no bounds clears the schedule
    Schedule {
        id: LinkId,
        /// Visible from (RFC 3339, "YYYY-MM-DD HH:MM" or "YYYY-MM-DD", UTC)
        #[arg(long)]
        start: Option<String>,
        /// Hidden from
        #[arg(long)]
        end: Option<String>,
        /// Time zone the schedule was planned in
        #[arg(long)]
        timezone: Option<String>,
    },
    /// Record a click on a link
    Click {
        id: LinkId,
    },
}

#[derive(Subcommand)]
enum SocialCommands {
    /// List social links
    #[command(alias = "ls")]
    List,
    /// Add or replace a social link
    Add {
        /// Platform name (e.g. Instagram)
        name: String,
        url: String,
    },
    /// Remove a social link
    #[command(alias = "rm")]
    Remove {
        name: String,
    },
}

#[derive(Subcommand, Clone)]
enum ConfigCommands {
    /// Show current configuration
    Show,
    /// Set a configuration value
    Set {
        /// Configuration key (api_url, token, user_id, sync_debounce_ms, ...)
        key: String,
        /// Configuration value
        value: String,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);
    let output = Output::new(OutputFormat::from_flags(cli.json, cli.quiet));

    // Config commands work without an API connection
    let command = match cli.command {
        Commands::Config { command } => return handle_config_command(command, &output),
        command => command,
    };

    let dashboard = Dashboard::connect(Config::load()?)?;

    match command {
        Commands::Status => commands::status::show(&dashboard, &output).await,
        Commands::Profile { command } => handle_profile_command(command, &dashboard, &output).await,
        Commands::Link { command } => handle_link_command(command, &dashboard, &output).await,
        Commands::Social { command } => handle_social_command(command, &dashboard, &output).await,
        Commands::Config { .. } => unreachable!(), // Handled above
    }
}

/// Log to stderr; RUST_LOG overrides the default filter
fn init_tracing(verbose: bool) {
    let default = if verbose {
        "linkdeck_core=debug,linkdeck_cli=debug"
    } else {
        "linkdeck_core=warn,linkdeck_cli=warn"
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .try_init();
}

async fn handle_profile_command(
    command: Option<ProfileCommands>,
    dashboard: &Dashboard,
    output: &Output,
) -> Result<()> {
    match command {
        Some(ProfileCommands::Show) | None => commands::profile::show(dashboard, output).await,
        Some(ProfileCommands::Set { field, value }) => {
            commands::profile::set(dashboard, field, value, output).await
        }
    }
}

async fn handle_link_command(
    command: LinkCommands,
    dashboard: &Dashboard,
    output: &Output,
) -> Result<()> {
    match command {
        LinkCommands::List => commands::link::list(dashboard, output).await,
        LinkCommands::Show { id } => commands::link::show(dashboard, id, output).await,
        LinkCommands::Add { title, url } => commands::link::add(dashboard, title, url, output).await,
        LinkCommands::Edit { id, title, url } => {
            commands::link::edit(dashboard, id, title, url, output).await
        }
        LinkCommands::Delete { id } => commands::link::delete(dashboard, id, output).await,
        LinkCommands::Toggle { id } => commands::link::toggle(dashboard, id, output).await,
        LinkCommands::Favorite { id } => commands::link::favorite(dashboard, id, output).await,
        LinkCommands::Move { id, position } => {
            commands::link::move_to(dashboard, id, position, output).await
        }
        LinkCommands::Schedule {
            id,
            start,
            end,
            timezone,
        } => commands::link::schedule(dashboard, id, start, end, timezone, output).await,
        LinkCommands::Click { id } => commands::link::click(dashboard, id, output).await,
    }
}

async fn handle_social_command(
    command: SocialCommands,
    dashboard: &Dashboard,
    output: &Output,
) -> Result<()> {
    match command {
        SocialCommands::List => commands::social::list(dashboard, output).await,
        SocialCommands::Add { name, url } => {
            commands::social::add(dashboard, name, url, output).await
        }
        SocialCommands::Remove { name } => commands::social::remove(dashboard, name, output).await,
    }
}

fn handle_config_command(command: Option<ConfigCommands>, output: &Output) -> Result<()> {
    match command {
        Some(ConfigCommands::Show) | None => commands::config::show(output),
        Some(ConfigCommands::Set { key, value }) => commands::config::set(key, value, output),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_link_schedule() {
        let cli = Cli::try_parse_from([
            "linkdeck",
            "link",
            "schedule",
            "3",
            "--start",
            "2026-05-01",
            "--json",
        ])
        .unwrap();

        assert!(cli.json);
        match cli.command {
            Commands::Link {
                command: LinkCommands::Schedule { id, start, end, .. },
            } => {
                assert_eq!(id, 3);
                assert_eq!(start.as_deref(), Some("2026-05-01"));
                assert!(end.is_none());
            }
            _ => panic!("expected link schedule"),
        }
    }

    #[test]
    fn test_rejects_non_numeric_link_id() {
        assert!(Cli::try_parse_from(["linkdeck", "link", "rm", "abc"]).is_err());
    }

    #[test]
    fn test_profile_defaults_to_show() {
        let cli = Cli::try_parse_from(["linkdeck", "profile"]).unwrap();
        assert!(matches!(cli.command, Commands::Profile { command: None }));
    }
}
