// Demo server: serves a suggestion and records rewards for the configured lab

use anyhow::{Context, Result};
use axum::{
    extract::State,
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use bandit_client::{BanditClient, BanditError, ClientConfig, CookieJarUpdate, Suggestion};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

struct AppError(BanditError);

impl From<BanditError> for AppError {
    fn from(err: BanditError) -> Self {
        Self(err)
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = match &self.0 {
            BanditError::EmptyUserId | BanditError::EmptyRewardToken => StatusCode::BAD_REQUEST,
            BanditError::NoRewardCookie | BanditError::ResourceNotFound { .. } => {
                StatusCode::NOT_FOUND
            }
            BanditError::Service(_) | BanditError::Decode(_) | BanditError::Transport(_) => {
                StatusCode::BAD_GATEWAY
            }
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        };

        tracing::warn!(status = status.as_u16(), error = %self.0, "Bandit request failed");
        (status, self.0.to_string()).into_response()
    }
}

async fn suggest(
    State(client): State<BanditClient>,
    headers: HeaderMap,
) -> Result<(CookieJarUpdate, Json<Suggestion>), AppError> {
    let (suggestion, cookies) = client.suggest_for_request(&headers).await?.into_parts();
    tracing::info!(
        variant = %suggestion.variant_code,
        experiment = %suggestion.experiment_code,
        "Served suggestion"
    );
    Ok((cookies, Json(suggestion)))
}

async fn reward(
    State(client): State<BanditClient>,
    headers: HeaderMap,
) -> Result<(CookieJarUpdate, StatusCode), AppError> {
    let ((), cookies) = client.reward_for_request(&headers).await?.into_parts();
    tracing::info!("Recorded reward");
    Ok((cookies, StatusCode::NO_CONTENT))
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,bandit_client=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = ClientConfig::from_env().context("Failed to load configuration")?;
    tracing::info!(
        account_id = config.account_id,
        lab_id = %config.lab_id,
        "Configuration loaded"
    );
    let client = config.into_client().context("Failed to build bandit client")?;

    let app = Router::new()
        .route("/suggest", get(suggest))
        .route("/reward", post(reward))
        .with_state(client);

    let port: u16 = std::env::var("PORT")
        .unwrap_or_else(|_| "3000".to_string())
        .parse()
        .context("PORT must be a valid number")?;
    let addr = format!("0.0.0.0:{}", port);
    tracing::info!("Starting demo server on {}", addr);

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .context("Failed to bind to address")?;

    axum::serve(listener, app).await.context("Server error")?;

    Ok(())
}
