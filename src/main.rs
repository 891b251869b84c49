use std::process;

use clap::{Parser, Subcommand};

use healthdash_lib::api::MetricsClient;
use healthdash_lib::chart::RenderContext;
use healthdash_lib::render::render_text;
use healthdash_lib::services::{Dashboard, DashboardView};
use healthdash_lib::state::{config_path, create_or_update_config, load_config, SessionStore};
use healthdash_lib::types::{ChartFilter, Config, MAX_PERIOD_DAYS};
use healthdash_lib::util::local_today;
use healthdash_lib::{DashboardError, MetricType};

#[derive(Parser)]
#[command(name = "healthdash")]
#[command(about = "Personal health metrics dashboard")]
#[command(version)]
struct Cli {
    /// Backend base URL, overrides the configured one
    #[arg(long, global = true, env = "HEALTHDASH_API_URL")]
    api_url: Option<String>,

    /// Log more (-v info, -vv debug). RUST_LOG takes precedence.
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Store the user id issued by the tracker's login page
    Login {
        user_id: String,
    },
    /// End the session on the backend and forget it locally
    Logout,
    /// Show summary cards and the trend chart
    Show {
        /// weight, blood-pressure or blood-sugar
        #[arg(long)]
        metric: Option<MetricType>,
        /// Days back from today to chart
        #[arg(long, value_parser = clap::value_parser!(u32).range(0..=MAX_PERIOD_DAYS as i64))]
        days: Option<u32>,
        /// Print the dashboard as JSON
        #[arg(long)]
        json: bool,
    },
    /// Configuration management
    Config {
        #[command(subcommand)]
        action: ConfigCommands,
    },
}

#[derive(Subcommand)]
enum ConfigCommands {
    /// Print the effective configuration
    Show,
    /// Set the backend base URL
    SetUrl { url: String },
    /// Set the chart defaults used by `show`
    SetDefaults {
        #[arg(long)]
        metric: Option<MetricType>,
        #[arg(long, value_parser = clap::value_parser!(u32).range(0..=MAX_PERIOD_DAYS as i64))]
        days: Option<u32>,
    },
}

fn init_logging(verbose: u8) {
    let default_filter = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter))
        .format_timestamp_millis()
        .init();
}

fn effective_config(api_url: Option<String>) -> Result<Config, DashboardError> {
    let mut config = load_config()?;
    if let Some(url) = api_url {
        config.api_base_url = url;
    }
    Ok(config)
}

async fn handle_show(
    config: &Config,
    metric: Option<MetricType>,
    days: Option<u32>,
    json: bool,
) -> Result<(), DashboardError> {
    let filter = ChartFilter::new(
        metric.unwrap_or(config.default_metric),
        days.unwrap_or(config.default_period_days),
    );
    let client = MetricsClient::from_config(config)?;
    let mut dashboard = Dashboard::new(client, SessionStore::default_location()?, filter);

    // One date for both the cards and the chart
    let today = local_today();
    dashboard.initialize().await?;
    let view = dashboard.view_on(today);
    let ctx = dashboard.render_on(RenderContext::new(), today);

    if json {
        println!("{}", serde_json::to_string_pretty(&view)?);
    } else {
        println!("{}", render_text(&view, &ctx));
    }

    if matches!(view, DashboardView::Error { .. }) {
        process::exit(1);
    }
    Ok(())
}

async fn handle_logout(config: &Config) -> Result<(), DashboardError> {
    let client = MetricsClient::from_config(config)?;
    let filter = ChartFilter::from(config);
    let mut dashboard = Dashboard::new(client, SessionStore::default_location()?, filter);

    if let Err(e) = dashboard.logout().await {
        if !e.requires_user_action() {
            eprintln!("Failed to logout. Please try again.");
        }
        return Err(e);
    }
    println!("Logged out.");
    Ok(())
}

fn handle_config(action: ConfigCommands, api_url: Option<String>) -> Result<(), DashboardError> {
    let path = config_path()?;
    match action {
        ConfigCommands::Show => {
            let config = effective_config(api_url)?;
            println!("# {}", path.display());
            println!("{}", serde_json::to_string_pretty(&config)?);
        }
        ConfigCommands::SetUrl { url } => {
            // Validate before persisting
            MetricsClient::new(&url, std::time::Duration::from_secs(1))?;
            create_or_update_config(&path, |c| c.api_base_url = url.trim().to_string())?;
            println!("API URL saved to {}", path.display());
        }
        ConfigCommands::SetDefaults { metric, days } => {
            let config = create_or_update_config(&path, |c| {
                if let Some(metric) = metric {
                    c.default_metric = metric;
                }
                if let Some(days) = days {
                    c.default_period_days = days;
                }
            })?;
            println!(
                "Defaults: {} over {} days",
                config.default_metric, config.default_period_days
            );
        }
    }
    Ok(())
}

async fn run(cli: Cli) -> Result<(), DashboardError> {
    match cli.command {
        Commands::Login { user_id } => {
            SessionStore::default_location()?.save(&user_id)?;
            println!("Logged in as {}.", user_id.trim());
            Ok(())
        }
        Commands::Logout => handle_logout(&effective_config(cli.api_url)?).await,
        Commands::Show { metric, days, json } => {
            handle_show(&effective_config(cli.api_url)?, metric, days, json).await
        }
        Commands::Config { action } => handle_config(action, cli.api_url),
    }
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    if let Err(e) = run(cli).await {
        eprintln!("Error: {}", e);
        if e.requires_user_action() {
            eprintln!("{}", e.recovery_suggestion());
        }
        process::exit(1);
    }
}
