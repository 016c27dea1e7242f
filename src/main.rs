use clap::{Parser, Subcommand};

mod app;
mod auth;
mod config;
mod error;
mod hello;
mod profiles;
mod state;
mod store;

use crate::{config::AppConfig, profiles::manager, state::AppState};

#[derive(Debug, Parser)]
#[command(name = "profiles-api", about = "User profile API server")]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Run the HTTP server (default).
    Serve,
    /// Create a staff superuser profile.
    CreateSuperuser {
        #[arg(long)]
        email: String,
        #[arg(long)]
        name: String,
        #[arg(long, env = "SUPERUSER_PASSWORD", hide_env_values = true)]
        password: String,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let env_filter = std::env::var("RUST_LOG")
        .unwrap_or_else(|_| "profiles_api=debug,axum=info,tower_http=info".to_string());
    let json_logs = std::env::var("LOG_FORMAT")
        .map(|v| v == "json")
        .unwrap_or(false);

    if json_logs {
        tracing_subscriber::fmt()
            .with_env_filter(env_filter)
            .with_target(false)
            .json()
            .init();
    } else {
        tracing_subscriber::fmt().with_env_filter(env_filter).init();
    }

    let cli = Cli::parse();
    let config = AppConfig::from_env()?;
    let (host, port) = (config.host.clone(), config.port);
    let app_state = AppState::init(config).await?;

    match cli.command.unwrap_or(Command::Serve) {
        Command::Serve => app::serve(app::build_app(app_state), &host, port).await,
        Command::CreateSuperuser {
            email,
            name,
            password,
        } => {
            let profile =
                manager::create_superuser(app_state.profiles.store(), &email, &name, &password)
                    .await
                    .map_err(|e| {
                        tracing::error!(error = ?e, "create-superuser failed");
                        anyhow::anyhow!("could not create superuser: {e}")
                    })?;
            tracing::info!(profile_id = profile.id, %profile, "superuser created");
            Ok(())
        }
    }
}
