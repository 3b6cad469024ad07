//! Dancemode CLI - Command-line client for the ticketing service.
//!
//! # Usage
//!
//! ```bash
//! # Check the service is up
//! dm-cli health
//!
//! # Sign in (password from --password or DANCEMODE_PASSWORD)
//! dm-cli login -e ada@example.com
//!
//! # Browse and fill the cart
//! dm-cli events list
//! dm-cli cart add-event 3f2b...
//! dm-cli cart checkout
//!
//! # Create venues, packages and events from a file
//! dm-cli data seed festival.yaml --policy abort
//! ```
//!
//! # Commands
//!
//! - `health` - Check the service
//! - `register`, `login`, `logout`, `whoami`, `profile` - Session management
//! - `events`, `venues`, `packages`, `catalog` - Browse the catalog
//! - `cart` - Edit the cart and check out
//! - `registrations` - List and pay registrations
//! - `data` - Export, import, statistics, clear and bulk seed

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use sentry::integrations::tracing as sentry_tracing;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use uuid::Uuid;

use dancemode_client::DancemodeClient;
use dancemode_client::api::BulkPolicy;
use dancemode_client::config::ClientConfig;
use dancemode_core::{DanceExperience, RegistrationId};

mod commands;

#[derive(Parser)]
#[command(name = "dm-cli")]
#[command(author, version, about = "Dancemode ticketing client")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Check that the service is reachable
    Health,
    /// Create an account and sign in
    Register {
        #[arg(short, long)]
        email: String,
        #[arg(long, env = "DANCEMODE_PASSWORD", hide_env_values = true)]
        password: String,
        #[arg(long)]
        first_name: String,
        #[arg(long)]
        last_name: String,
        #[arg(long)]
        phone: Option<String>,
        /// `beginner`, `intermediate`, `advanced` or `professional`
        #[arg(long, default_value = "beginner")]
        experience: DanceExperience,
    },
    /// Sign in
    Login {
        #[arg(short, long)]
        email: String,
        #[arg(long, env = "DANCEMODE_PASSWORD", hide_env_values = true)]
        password: String,
    },
    /// Sign out and forget the session
    Logout,
    /// Show the signed-in user
    Whoami,
    /// Manage the signed-in user's profile
    Profile {
        #[command(subcommand)]
        action: ProfileAction,
    },
    /// Browse events
    Events {
        #[command(subcommand)]
        action: ListAction,
    },
    /// Browse venues
    Venues {
        #[command(subcommand)]
        action: ListAction,
    },
    /// Browse packages
    Packages {
        #[command(subcommand)]
        action: ListAction,
    },
    /// Load events, venues, packages and statistics at once
    Catalog,
    /// Edit the cart
    Cart {
        #[command(subcommand)]
        action: CartAction,
    },
    /// Manage registrations
    Registrations {
        #[command(subcommand)]
        action: RegistrationAction,
    },
    /// Data administration
    Data {
        #[command(subcommand)]
        action: DataAction,
    },
}

#[derive(Subcommand)]
enum ListAction {
    /// List all records
    List,
}

#[derive(Subcommand)]
enum ProfileAction {
    /// Fetch the profile from the service
    Show,
    /// Update profile fields
    Update {
        #[arg(long)]
        first_name: Option<String>,
        #[arg(long)]
        last_name: Option<String>,
        #[arg(long)]
        username: Option<String>,
        #[arg(long)]
        phone: Option<String>,
        #[arg(long)]
        experience: Option<DanceExperience>,
    },
}

#[derive(Subcommand)]
enum CartAction {
    /// Show cart contents
    Show,
    /// Add an event by ID
    AddEvent { id: Uuid },
    /// Add a package by ID
    AddPackage { id: Uuid },
    /// Remove an event or package by ID
    Remove {
        id: Uuid,
        /// Remove the package with this ID instead of the event
        #[arg(long)]
        package: bool,
    },
    /// Empty the cart
    Clear,
    /// Register for everything in the cart
    Checkout,
}

#[derive(Subcommand)]
enum RegistrationAction {
    /// List your registrations
    List,
    /// Pay for a registration
    Pay {
        id: RegistrationId,
        #[arg(long, default_value = "card")]
        method: String,
    },
}

#[derive(Subcommand)]
enum DataAction {
    /// Write a full export to a JSON file
    Export {
        #[arg(short, long, default_value = "dancemode-export.json")]
        output: PathBuf,
    },
    /// Load an export file
    Import { file: PathBuf },
    /// Show record counts
    Stats,
    /// Delete every record
    Clear {
        /// Required to confirm
        #[arg(long)]
        yes: bool,
    },
    /// Create venues, packages and events from a YAML or JSON file
    Seed {
        file: PathBuf,
        /// `continue` or `abort` when a step fails (default from DANCEMODE_BULK_POLICY)
        #[arg(long)]
        policy: Option<BulkPolicy>,
        /// Replace existing records
        #[arg(long)]
        replace: bool,
    },
}

/// Initialize Sentry error tracking and return guard that must be kept alive.
fn init_sentry(config: &ClientConfig) -> Option<sentry::ClientInitGuard> {
    let dsn = config.sentry_dsn.as_ref()?;

    let guard = sentry::init((
        dsn.as_str(),
        sentry::ClientOptions {
            release: sentry::release_name!(),
            environment: config
                .sentry_environment
                .clone()
                .map(std::borrow::Cow::Owned),
            attach_stacktrace: true,
            ..Default::default()
        },
    ));

    tracing::info!("Sentry initialized");
    Some(guard)
}

/// Filter tracing events to Sentry event types.
fn sentry_event_filter(metadata: &tracing::Metadata<'_>) -> sentry_tracing::EventFilter {
    match *metadata.level() {
        tracing::Level::ERROR | tracing::Level::WARN => sentry_tracing::EventFilter::Event,
        tracing::Level::INFO | tracing::Level::DEBUG => sentry_tracing::EventFilter::Breadcrumb,
        _ => sentry_tracing::EventFilter::Ignore,
    }
}

fn init_tracing() {
    // Defaults to info level for our crates if RUST_LOG is not set
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "dancemode_client=info,dancemode_cli=info".into());

    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer())
        .with(sentry_tracing::layer().event_filter(sentry_event_filter))
        .init();
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let config = match ClientConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            init_tracing();
            tracing::error!("Invalid configuration: {e}");
            std::process::exit(1);
        }
    };

    // Initialize Sentry (must be done before tracing subscriber)
    let _sentry_guard = init_sentry(&config);
    init_tracing();

    let result: Result<(), Box<dyn std::error::Error>> = run(cli, config).await;

    if let Err(e) = result {
        tracing::error!("Command failed: {e}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli, config: ClientConfig) -> Result<(), Box<dyn std::error::Error>> {
    let default_policy = config.bulk_policy;
    let client = DancemodeClient::new(config)?;

    match cli.command {
        Commands::Health => commands::health(&client).await?,
        Commands::Register {
            email,
            password,
            first_name,
            last_name,
            phone,
            experience,
        } => {
            let account = commands::session::NewAccount {
                email,
                password,
                first_name,
                last_name,
                phone,
                experience,
            };
            commands::session::register(&client, account).await?;
        }
        Commands::Login { email, password } => {
            commands::session::login(&client, email, password).await?;
        }
        Commands::Logout => commands::session::logout(&client).await,
        Commands::Whoami => commands::session::whoami(&client),
        Commands::Profile { action } => match action {
            ProfileAction::Show => commands::session::show_profile(&client).await?,
            ProfileAction::Update {
                first_name,
                last_name,
                username,
                phone,
                experience,
            } => {
                let update = dancemode_core::models::UserProfileUpdate {
                    first_name,
                    last_name,
                    username,
                    phone,
                    dance_experience: experience,
                    ..Default::default()
                };
                commands::session::update_profile(&client, &update).await?;
            }
        },
        Commands::Events {
            action: ListAction::List,
        } => commands::catalog::list_events(&client).await?,
        Commands::Venues {
            action: ListAction::List,
        } => commands::catalog::list_venues(&client).await?,
        Commands::Packages {
            action: ListAction::List,
        } => commands::catalog::list_packages(&client).await?,
        Commands::Catalog => commands::catalog::load_all(&client).await?,
        Commands::Cart { action } => match action {
            CartAction::Show => commands::cart::show(&client),
            CartAction::AddEvent { id } => commands::cart::add_event(&client, id).await?,
            CartAction::AddPackage { id } => commands::cart::add_package(&client, id).await?,
            CartAction::Remove { id, package } => commands::cart::remove(&client, id, package),
            CartAction::Clear => commands::cart::clear(&client),
            CartAction::Checkout => commands::cart::checkout(&client).await?,
        },
        Commands::Registrations { action } => match action {
            RegistrationAction::List => commands::registrations::list(&client).await?,
            RegistrationAction::Pay { id, method } => {
                commands::registrations::pay(&client, id, method).await?;
            }
        },
        Commands::Data { action } => match action {
            DataAction::Export { output } => commands::data::export(&client, &output).await?,
            DataAction::Import { file } => commands::data::import(&client, &file).await?,
            DataAction::Stats => commands::data::stats(&client).await?,
            DataAction::Clear { yes } => commands::data::clear(&client, yes).await?,
            DataAction::Seed {
                file,
                policy,
                replace,
            } => {
                commands::data::seed(&client, &file, policy.unwrap_or(default_policy), replace)
                    .await?;
            }
        },
    }
    Ok(())
}
