//! TaskHive Server — application entry point.

mod app;

use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::from_default_env().add_directive("taskhive=info".parse().unwrap()),
        )
        .json()
        .init();

    tracing::info!("Starting TaskHive server...");

    let config = taskhive_db::DbConfig::from_env();
    let manager = match taskhive_db::DbManager::connect(&config).await {
        Ok(manager) => manager,
        Err(err) => {
            tracing::error!(error = %err, "Failed to connect to SurrealDB");
            std::process::exit(1);
        }
    };

    if let Err(err) = taskhive_db::run_migrations(manager.client()).await {
        tracing::error!(error = %err, "Failed to run migrations");
        std::process::exit(1);
    }

    let _services = app::build_services(manager.client().clone());

    // TODO: mount the HTTP router onto AppServices once the transport
    // layer lands.

    tracing::info!("TaskHive server ready.");
}
