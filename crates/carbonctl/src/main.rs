//! Carbon Control - CLI client for the Carbon Footprint Tracker
//!
//! Looks up activities, calculates emissions and manages tip subscriptions.

use anyhow::Result;
use carbon_common::{CarbonClient, CarbonError, ClientConfig};
use carbonctl::commands::{self, CalculateArgs};
use carbonctl::{display, interactive};
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

// Version is embedded at build time
const VERSION: &str = env!("CARBON_VERSION");

#[derive(Parser)]
#[command(name = "carbonctl")]
#[command(about = "Carbon Footprint Tracker - emission calculator and weekly tips", long_about = None)]
#[command(version = VERSION)]
struct Cli {
    /// API base URL (overrides config and CARBON_API_URL)
    #[arg(long, global = true)]
    api_url: Option<String>,

    /// Verbose logging to stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List activities, optionally for one category
    Activities {
        #[arg(long)]
        category: Option<String>,

        /// Print raw JSON
        #[arg(long)]
        json: bool,
    },

    /// List activity categories
    Categories,

    /// Calculate CO2 emissions for an activity
    Calculate {
        /// Quantity in the activity's basis unit (km, kWh, kg, ...)
        #[arg(allow_negative_numbers = true)]
        quantity: String,

        #[arg(long)]
        category: Option<String>,

        /// Activity key, e.g. car_gasoline
        #[arg(long)]
        activity: Option<String>,

        /// Record the calculation under this email
        #[arg(long)]
        email: Option<String>,

        /// Print raw JSON
        #[arg(long)]
        json: bool,
    },

    /// Subscribe for weekly carbon tips
    Subscribe { email: String },

    /// Stop weekly carbon tips
    Unsubscribe { email: String },

    /// Send a weekly tip now
    Tip { email: String },

    /// Show recorded calculations for an email
    History { email: String },

    /// List all users
    Users,

    /// Check API health
    Health,

    /// Interactive calculator session
    Interactive {
        #[arg(long)]
        email: Option<String>,
    },
}

fn init_logging(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_writer(std::io::stderr)
        .with_target(false)
        .without_time()
        .init();
}

async fn dispatch(command: Commands, client: &CarbonClient, config: &ClientConfig) -> Result<(), CarbonError> {
    match command {
        Commands::Activities { category, json } => commands::activities(client, category, json).await,
        Commands::Categories => commands::categories(client).await,
        Commands::Calculate {
            quantity,
            category,
            activity,
            email,
            json,
        } => {
            let args = CalculateArgs {
                category,
                activity,
                quantity,
                email: email.or_else(|| config.user_email.clone()),
                json,
            };
            commands::calculate(client, args).await
        }
        Commands::Subscribe { email } => commands::subscribe(client, email).await,
        Commands::Unsubscribe { email } => commands::unsubscribe(client, email).await,
        Commands::Tip { email } => commands::send_tip(client, email).await,
        Commands::History { email } => commands::history(client, email).await,
        Commands::Users => commands::users(client).await,
        Commands::Health => commands::health(client).await,
        Commands::Interactive { email } => {
            let email = email.or_else(|| config.user_email.clone());
            let stdin = std::io::stdin();
            let mut stdout = std::io::stdout();
            interactive::run_session(client, email.as_deref(), stdin.lock(), &mut stdout).await?;
            Ok(())
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let mut config = ClientConfig::load()?;
    if let Some(url) = cli.api_url {
        config.api_url = url;
    }
    let client = CarbonClient::from_config(&config)?;

    if let Err(e) = dispatch(cli.command, &client, &config).await {
        tracing::debug!("Command failed: {}", e);
        eprintln!("{}", display::error_line(&e.user_message()));
        std::process::exit(e.exit_code());
    }
    Ok(())
}
