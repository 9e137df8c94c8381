use anyhow::Result;
use clap::{Parser, Subcommand};

use audit_trail::cli::{handle_log_command, LogCommands};
use audit_trail::config::{paths::AuditPaths, settings::Settings};
use audit_trail::models::LogFormat;
use audit_trail::AuditTrail;

#[derive(Parser)]
#[command(
    name = "audit-trail",
    version,
    about = "Append to and inspect entity audit logs stored as JSON or XML",
    long_about = "audit-trail keeps an entity's whole change history in a single \
                  serialized value. Appends keep whatever format the existing log \
                  already uses; new logs use the configured default format."
)]
struct Cli {
    /// Format for logs that do not exist yet (overrides the settings file)
    #[arg(long, global = true)]
    format: Option<LogFormat>,

    /// Enable debug logging on stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    #[command(flatten)]
    Log(LogCommands),

    /// Show current configuration and paths
    Config,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose)?;

    let paths = AuditPaths::new()?;
    let mut settings = Settings::load_or_create(&paths)?;
    if let Some(format) = cli.format {
        settings.default_format = format;
    }
    let trail = AuditTrail::from_settings(&settings);

    match cli.command {
        Some(Commands::Log(cmd)) => {
            handle_log_command(&trail, cmd)?;
        }
        Some(Commands::Config) => {
            println!("audit-trail Configuration");
            println!("=========================");
            println!("Config directory: {}", paths.base_dir().display());
            println!("Settings file:    {}", paths.settings_file().display());
            println!();
            println!("Settings:");
            println!("  Default format: {}", settings.default_format);
            println!("  Anonymous user: {}", settings.anonymous_user);
        }
        None => {
            println!("audit-trail - Entity audit logs in JSON or XML");
            println!();
            println!("Run 'audit-trail --help' for usage information.");
        }
    }

    Ok(())
}

fn init_tracing(verbose: bool) -> Result<()> {
    let level = if verbose { "debug" } else { "warn" };

    let filter = tracing_subscriber::EnvFilter::try_from_env("AUDIT_TRAIL_LOG")
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init()
        .map_err(|error| anyhow::anyhow!("failed to initialize tracing subscriber: {error}"))?;

    Ok(())
}
