//! Pharmacy CLI - Command-line storefront.
//!
//! # Usage
//!
//! ```bash
//! # Create an account, then log in
//! pharmacy signup -u alice -p secret -c secret
//! pharmacy login -u alice -p secret
//!
//! # Browse the catalog
//! pharmacy products --form Tablet --symptom fever --search para
//! pharmacy product 7
//!
//! # Manage the cart
//! pharmacy cart add 7
//! pharmacy cart quantity 7 -1
//! pharmacy cart show
//!
//! # Forget the session and the cart
//! pharmacy logout
//! ```
//!
//! # Commands
//!
//! - `login` / `signup` / `logout` / `profile` - Session management
//! - `products` / `product` - Catalog (login required)
//! - `cart` - Cart kept in the local store
//!
//! Session and cart survive between runs in the file named by
//! `PHARMACY_STORAGE_PATH`.

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::io::Write;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use pharmacy_core::DrugId;
use pharmacy_storefront::config::StorefrontConfig;
use pharmacy_storefront::state::AppState;
use sentry::integrations::tracing as sentry_tracing;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod commands;

#[derive(Parser)]
#[command(name = "pharmacy")]
#[command(author, version, about = "Online pharmacy storefront")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Log in and remember the session
    Login {
        #[arg(short, long)]
        username: String,

        #[arg(short, long)]
        password: String,
    },
    /// Create an account (does not log in)
    Signup {
        #[arg(short, long)]
        username: String,

        #[arg(short, long)]
        password: String,

        /// Password confirmation; must equal `--password`
        #[arg(short = 'c', long = "confirm")]
        confirm_password: String,
    },
    /// Forget the session and empty the cart
    Logout,
    /// Show the logged-in user and cart summary
    Profile {
        /// Re-read the username from the backend first
        #[arg(long)]
        refresh: bool,
    },
    /// List the catalog
    Products {
        /// Physical form, e.g. Tablet ("All" for any)
        #[arg(long, default_value = "All")]
        form: String,

        /// Symptom tag, e.g. Fever ("All" for any)
        #[arg(long, default_value = "All")]
        symptom: String,

        /// Case-insensitive name search
        #[arg(long, default_value = "")]
        search: String,
    },
    /// Show one product
    Product { id: DrugId },
    /// Manage the cart
    Cart {
        #[command(subcommand)]
        action: CartAction,
    },
}

#[derive(Subcommand)]
enum CartAction {
    /// List cart lines and the total
    Show,
    /// Add one unit of a product (login required)
    Add { id: DrugId },
    /// Change a line's quantity by a signed amount (never below 1)
    Quantity {
        id: DrugId,

        #[arg(allow_negative_numbers = true)]
        delta: i64,
    },
    /// Remove a line
    Remove { id: DrugId },
    /// Empty the cart
    Clear,
}

/// Initialize Sentry error tracking and return guard that must be kept alive.
fn init_sentry(config: &StorefrontConfig) -> Option<sentry::ClientInitGuard> {
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
        .unwrap_or_else(|_| "pharmacy_storefront=info,pharmacy_cli=info".into());

    // Logs go to stderr; stdout carries command output
    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(sentry_tracing::layer().event_filter(sentry_event_filter))
        .init();
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    // Load configuration first (needed for Sentry init)
    let config = StorefrontConfig::from_env();
    let _sentry_guard = config.as_ref().ok().and_then(init_sentry);
    init_tracing();

    let config = match config {
        Ok(config) => config,
        Err(e) => {
            tracing::error!("Invalid configuration: {e}");
            return ExitCode::FAILURE;
        }
    };

    let state = match AppState::new(&config) {
        Ok(state) => state,
        Err(e) => {
            tracing::error!("Failed to open local store: {e}");
            return ExitCode::FAILURE;
        }
    };

    let mut out = std::io::stdout().lock();
    match run(&state, cli.command, &mut out).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            e.report();
            let _ = writeln!(std::io::stderr(), "{}", e.user_message());
            ExitCode::FAILURE
        }
    }
}

async fn run(state: &AppState, command: Commands, out: &mut impl Write) -> commands::Result<()> {
    match command {
        Commands::Login { username, password } => {
            commands::auth::login(state, &username, password, out).await
        }
        Commands::Signup {
            username,
            password,
            confirm_password,
        } => commands::auth::signup(state, &username, password, confirm_password, out).await,
        Commands::Logout => commands::auth::logout(state, out),
        Commands::Profile { refresh } => commands::auth::profile(state, refresh, out).await,
        Commands::Products {
            form,
            symptom,
            search,
        } => commands::catalog::products(state, &form, &symptom, &search, out).await,
        Commands::Product { id } => commands::catalog::product(state, id, out).await,
        Commands::Cart { action } => match action {
            CartAction::Show => commands::cart::show(state, out),
            CartAction::Add { id } => commands::cart::add(state, id, out).await,
            CartAction::Quantity { id, delta } => commands::cart::quantity(state, id, delta, out),
            CartAction::Remove { id } => commands::cart::remove(state, id, out),
            CartAction::Clear => commands::cart::clear(state, out),
        },
    }
}

#[cfg(test)]
mod tests {
    use clap::CommandFactory;

    use super::*;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_negative_quantity_delta_parses() {
        let cli = Cli::try_parse_from(["pharmacy", "cart", "quantity", "7", "-1"]);
        assert!(matches!(
            cli.map(|c| c.command),
            Ok(Commands::Cart {
                action: CartAction::Quantity { delta: -1, .. }
            })
        ));
    }

    #[test]
    fn test_signup_confirm_flag() {
        let cli = Cli::try_parse_from([
            "pharmacy", "signup", "-u", "bob", "-p", "pw", "-c", "pw2",
        ]);
        assert!(matches!(
            cli.map(|c| c.command),
            Ok(Commands::Signup { ref confirm_password, .. }) if confirm_password == "pw2"
        ));
    }
}
