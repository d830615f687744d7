//! rowpush CLI - Main entry point

use clap::Parser;
use rowpush_cli::commands;
use rowpush_cli::config::Settings;
use rowpush_cli::settings::SettingsStore;
use rowpush_cli::{Cli, Commands, ConfigCommand};
use rowpush_common::logging::{init_logging, LogConfig, LogLevel, LogOutput};
use std::process;
use tracing::error;

#[tokio::main]
async fn main() {
    // Values from a local .env act like exported environment variables
    let _ = dotenvy::dotenv();

    let cli = Cli::parse();

    if cli.markdown_help {
        println!("{}", clap_markdown::help_markdown::<Cli>());
        return;
    }

    let Some(command) = cli.command else {
        eprintln!("Error: A subcommand is required");
        eprintln!();
        eprintln!("For more information, try '--help'.");
        process::exit(2);
    };

    // Quiet by default; --verbose shows the delivery log. LOG_* variables win.
    let log_config = LogConfig::builder()
        .level(if cli.verbose { LogLevel::Debug } else { LogLevel::Warn })
        .output(LogOutput::Console)
        .log_file_prefix("rowpush-cli")
        .build();
    let log_config = log_config.clone().merge_env().unwrap_or(log_config);

    // The CLI works without logging, so a failed init is not fatal
    let _guard = match init_logging(&log_config) {
        Ok(guard) => Some(guard),
        Err(e) => {
            eprintln!("Warning: logging disabled: {:#}", e);
            None
        },
    };

    if let Err(e) = execute_command(cli.config_dir, command).await {
        error!(error = %e, "Command failed");
        eprintln!("Error: {}", e);
        process::exit(1);
    }
}

async fn execute_command(
    config_dir: Option<std::path::PathBuf>,
    command: Commands,
) -> rowpush_cli::Result<()> {
    let mut settings = Settings::load(SettingsStore::open(config_dir)?)?;

    match command {
        Commands::Push {
            database,
            source,
            filter,
            delivery,
        } => commands::push::run(&mut settings, database, &source, &filter, &delivery).await,

        Commands::PushAll {
            database,
            source,
            filter,
            delivery,
        } => commands::push_all::run(&mut settings, database, &source, &filter, &delivery).await,

        Commands::Send {
            files,
            filter,
            delivery,
        } => commands::send::run(&mut settings, &files, &filter, &delivery).await,

        Commands::Preview {
            database,
            limit,
            source,
            filter,
        } => commands::preview::run(&mut settings, database, limit, &source, &filter).await,

        Commands::Databases { source, output } => {
            commands::databases::run(&mut settings, &source, output).await
        },

        Commands::Check { server_url } => commands::check::run(server_url).await,

        Commands::Config { command } => match command {
            ConfigCommand::Get { key } => commands::config::get(&settings, key).await,
            ConfigCommand::Set { key, value } => commands::config::set(&settings, key, value).await,
            ConfigCommand::Show => commands::config::show(&settings).await,
        },
    }
}
