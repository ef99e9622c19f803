//! insitu CLI - Delivery, request and work-assignment coordination for construction sites

use clap::Parser;
use insitu::cli::commands;
use insitu::cli::{Cli, Commands};
use insitu::errors::to_exit_code;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    // Initialize tracing; RUST_LOG wins over the flags
    let default_level = if cli.verbose {
        "debug"
    } else if cli.quiet {
        "warn"
    } else {
        "info"
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let result = run(cli).await;

    match result {
        Ok(()) => std::process::exit(0),
        Err(e) => {
            eprintln!("Error [{}]: {}", e.code(), e);
            std::process::exit(to_exit_code(&e));
        }
    }
}

async fn run(cli: Cli) -> insitu::Result<()> {
    let cwd = cli.cwd.as_deref();
    let json = cli.json;
    match cli.command {
        Some(Commands::Init { force }) => commands::init::run(cwd, force).await,
        Some(Commands::Signup {
            email,
            password,
            name,
            role,
        }) => commands::auth::signup(cwd, json, &email, &password, &name, role).await,
        Some(Commands::Login { email, password }) => {
            commands::auth::login(cwd, json, &email, &password).await
        }
        Some(Commands::Logout) => commands::auth::logout(cwd).await,
        Some(Commands::Whoami) => commands::auth::whoami(cwd, json).await,
        Some(Commands::Dashboard { tab }) => commands::dashboard::run(cwd, json, tab.as_deref()).await,
        Some(Commands::Delivery(command)) => commands::delivery::run(cwd, json, command).await,
        Some(Commands::Request(command)) => commands::request::run(cwd, json, command).await,
        Some(Commands::Assignment(command)) => commands::assignment::run(cwd, json, command).await,
        Some(Commands::Workers(command)) => commands::workers::run(cwd, json, command).await,
        Some(Commands::Worksite(command)) => commands::worksite::run(cwd, json, command).await,
        Some(Commands::Notifications(command)) => {
            commands::notifications::run(cwd, json, command).await
        }
        None => {
            // Default to showing help - clap handles this
            println!("Use --help for usage information");
            Ok(())
        }
    }
}
