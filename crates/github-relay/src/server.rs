use std::net::SocketAddr;
use std::sync::Arc;

use axum::{
    Router,
    body::Bytes,
    extract::State,
    http::{HeaderMap, StatusCode},
    routing::{get, post},
};
use github_notify::{ConvertError, DiscordMessage, DiscordRenderer, IrcRenderer, PreparedEvent};
use tracing::{info, instrument, warn};

use crate::config::RelayConfig;
use crate::deliver::{Deliver, Relay};
use crate::ingest::{self, Delivery};
use crate::routing::Routes;
use crate::signature::{self, SIGNATURE_HEADER};

type Reply = (StatusCode, String);

pub struct AppState<D> {
    deliver: Arc<D>,
    webhook_secret: Option<Arc<str>>,
    routes: Arc<Routes>,
}

impl<D> Clone for AppState<D> {
    fn clone(&self) -> Self {
        Self {
            deliver: Arc::clone(&self.deliver),
            webhook_secret: self.webhook_secret.clone(),
            routes: Arc::clone(&self.routes),
        }
    }
}

impl<D: Deliver> AppState<D> {
    pub fn new(config: &RelayConfig, deliver: D) -> Self {
        Self {
            deliver: Arc::new(deliver),
            webhook_secret: config.webhook_secret.as_deref().map(Arc::from),
            routes: Arc::new(config.routes.clone()),
        }
    }
}

/// `POST /webhook` and `GET /health`.
pub fn router<D: Deliver>(state: AppState<D>) -> Router {
    Router::new()
        .route("/webhook", post(handle_webhook::<D>))
        .route("/health", get(health))
        .with_state(state)
}

/// Starts the relay HTTP server with irker and Discord delivery.
pub async fn serve(config: RelayConfig) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let relay = Relay::new(config.irker_addr.clone(), config.delivery_timeout)?;

    if config.webhook_secret.is_none() {
        warn!("GITHUB_WEBHOOK_SECRET is not set, signatures are not verified");
    }
    info!(
        irc_routes = config.routes.irc.len(),
        discord_routes = config.routes.discord.len(),
        irker = %config.irker_addr,
        "Routes loaded"
    );

    let app = router(AppState::new(&config, relay));

    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    info!(addr = %addr, "GitHub webhook relay listening");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

async fn health() -> &'static str {
    "ok"
}

#[instrument(
    name = "github.webhook",
    skip_all,
    fields(
        event = tracing::field::Empty,
        delivery = tracing::field::Empty,
        repository = tracing::field::Empty,
    )
)]
async fn handle_webhook<D: Deliver>(
    State(state): State<AppState<D>>,
    headers: HeaderMap,
    body: Bytes,
) -> Reply {
    if let Some(secret) = &state.webhook_secret {
        let sig = headers
            .get(SIGNATURE_HEADER)
            .and_then(|v| v.to_str().ok());

        if let Err(e) = signature::check(secret, &body, sig) {
            warn!(error = %e, "Rejected GitHub webhook signature");
            return (StatusCode::UNAUTHORIZED, e.to_string());
        }
    }

    let Delivery {
        id,
        repository,
        event,
    } = match ingest::parse(&headers, &body) {
        Ok(delivery) => delivery,
        Err(e) => {
            warn!(error = %e, "Invalid GitHub webhook request");
            return (StatusCode::BAD_REQUEST, e.to_string());
        }
    };

    let span = tracing::Span::current();
    span.record("event", event.event_type());
    span.record("delivery", id.as_str());
    span.record("repository", repository.as_str());

    let irc_targets = state.routes.irc.targets_for(&repository);
    let discord_webhooks = state.routes.discord.targets_for(&repository);
    if irc_targets.is_empty() && discord_webhooks.is_empty() {
        info!("No route matches the repository");
        return (StatusCode::OK, format!("No route for {repository}."));
    }

    let rendered = PreparedEvent::new(event).and_then(|prepared| {
        render(
            &prepared,
            !irc_targets.is_empty(),
            !discord_webhooks.is_empty(),
        )
    });
    let (line, message) = match rendered {
        Ok(rendered) => rendered,
        Err(e) => return conversion_failure(e),
    };

    let mut failure = None;
    if let Some(line) = line
        && let Err(e) = state.deliver.send_irc(&irc_targets, &line).await
    {
        warn!(error = %e, "irker delivery failed");
        failure = Some(e);
    }
    if let Some(message) = message
        && let Err(e) = state.deliver.send_discord(&discord_webhooks, &message).await
    {
        warn!(error = %e, "Discord delivery failed");
        failure.get_or_insert(e);
    }

    match failure {
        Some(e) => (StatusCode::BAD_GATEWAY, format!("Delivery failed: {e}")),
        None => (StatusCode::ACCEPTED, "Payload sent.".to_string()),
    }
}

/// Renders for every family that has targets before anything is sent, so a
/// rendering failure never leaves a delivery half done.
fn render(
    prepared: &PreparedEvent,
    irc: bool,
    discord: bool,
) -> Result<(Option<String>, Option<DiscordMessage>), ConvertError> {
    let line = irc.then(|| prepared.render(&IrcRenderer)).transpose()?;
    let message = discord
        .then(|| prepared.render(&DiscordRenderer))
        .transpose()?;
    Ok((line, message))
}

fn conversion_failure(err: ConvertError) -> Reply {
    match err {
        ConvertError::Ignored(reason) => {
            info!(reason = %reason, "Ignored GitHub event");
            (StatusCode::OK, "This GitHub event is ignored.".to_string())
        }
        ConvertError::NotImplemented { .. } => {
            warn!(error = %err, "Unsupported GitHub event");
            (
                StatusCode::NOT_IMPLEMENTED,
                format!("Unsupported GitHub event: {err}"),
            )
        }
        ConvertError::Validation(_) => {
            warn!(error = %err, "Malformed GitHub payload");
            (StatusCode::BAD_REQUEST, err.to_string())
        }
    }
}
