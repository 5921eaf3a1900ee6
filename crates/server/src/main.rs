use database::db::create_connection;
use log::{error, info};
use server::{app, auth::StaffClaims, config::Config, state::AppState, utils::shutdown};
use std::process::ExitCode;
use tower_oauth2_resource_server::server::OAuth2ResourceServer;

#[tokio::main]
async fn main() -> ExitCode {
    env_logger::init();

    match run().await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            error!("{err}");
            ExitCode::FAILURE
        }
    }
}

async fn run() -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::from_env()?;

    let db = create_connection(&config.database_url).await?;

    let resource_server = OAuth2ResourceServer::<StaffClaims>::builder()
        .issuer_url(config.oidc_issuer_url.as_str())
        .build()
        .await
        .map_err(|e| format!("Failed to build OAuth2ResourceServer: {e:?}"))?;

    info!(
        "Prerequisite policy {}, pass mark {}",
        config.rules.policy, config.rules.pass_mark.0
    );

    let app = app(AppState::new(db, config.rules), Some(resource_server));

    let listener = tokio::net::TcpListener::bind(config.bind_addr).await?;
    info!("Running axum on http://{}", config.bind_addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown::shutdown_signal())
        .await?;

    Ok(())
}
