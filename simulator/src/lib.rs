use axum::{
    body::Bytes,
    extract::{ws::WebSocketUpgrade, State as AxumState},
    http::{header, Method, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Router,
};
use commonware_codec::{DecodeExt, Encode};
use commonware_runtime::{Clock, Metrics, Spawner};
use futures::{SinkExt, StreamExt};
use hotline_execution::{run_to_settlement, Game, GameError, Schedule};
use hotline_types::{
    api::{BetAction, Viewport},
    CardType, Event, Mode, Snapshot,
};
use std::sync::{Arc, Mutex, MutexGuard};
use thiserror::Error;
use tokio::sync::broadcast;
use tower_governor::{
    governor::GovernorConfigBuilder, key_extractor::SmartIpKeyExtractor, GovernorLayer,
};
use tower_http::cors::{Any, CorsLayer};

mod config;
pub use config::Config;

/// Error returned by simulator operations.
#[derive(Debug, Error)]
pub enum Error {
    #[error("game error: {0}")]
    Game(#[from] GameError),
    #[error("invalid request: {0}")]
    InvalidRequest(#[from] commonware_codec::Error),
}

impl Error {
    pub fn status(&self) -> StatusCode {
        match self {
            Self::Game(GameError::SpinInProgress) => StatusCode::CONFLICT,
            Self::Game(GameError::InvalidBet(_)) | Self::InvalidRequest(_) => {
                StatusCode::BAD_REQUEST
            }
            Self::Game(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        (self.status(), self.to_string()).into_response()
    }
}

/// A single table driven by a runtime clock.
#[derive(Clone)]
pub struct Simulator<E: Clock + Spawner + Metrics> {
    context: E,
    game: Arc<Mutex<Game>>,
    schedule: Schedule,
    update_tx: broadcast::Sender<Event>,
}

fn publish(update_tx: &broadcast::Sender<Event>, event: Event) {
    if let Err(e) = update_tx.send(event) {
        tracing::warn!("Failed to broadcast event: {}", e);
    }
}

impl<E: Clock + Spawner + Metrics> Simulator<E> {
    pub fn new(context: E, seed: u64, viewport_width: u32, schedule: Schedule) -> Self {
        let (update_tx, _) = broadcast::channel(1024);
        Self {
            context,
            game: Arc::new(Mutex::new(Game::new(seed, viewport_width))),
            schedule,
            update_tx,
        }
    }

    fn game(&self) -> Result<MutexGuard<'_, Game>, Error> {
        self.game.lock().map_err(|e| {
            tracing::error!("Failed to acquire game lock: {}", e);
            Error::Game(GameError::Poisoned)
        })
    }

    pub fn snapshot(&self) -> Result<Snapshot, Error> {
        Ok(self.game()?.snapshot())
    }

    pub fn apply_bet(&self, action: BetAction) -> Result<u64, Error> {
        let mut game = self.game()?;
        let bet = match action {
            BetAction::Set(amount) => game.set_bet(amount)?,
            BetAction::Increase => game.increase_bet()?,
            BetAction::Decrease => game.decrease_bet()?,
        };
        Ok(bet)
    }

    pub fn toggle_mode(&self) -> Result<Mode, Error> {
        Ok(self.game()?.toggle_mode()?)
    }

    pub fn set_viewport(&self, viewport: Viewport) -> Result<usize, Error> {
        Ok(self.game()?.set_viewport(viewport.width))
    }

    /// Start a round and play it out in the background.
    ///
    /// Fails immediately if a round is already in flight.
    pub fn spin(&self, bet_type: CardType) -> Result<Event, Error> {
        let (started, started_at) = {
            let mut game = self.game()?;
            let started = game.start_spin(bet_type)?;
            (started, self.context.current())
        };
        publish(&self.update_tx, started.clone());

        let game = self.game.clone();
        let schedule = self.schedule;
        let update_tx = self.update_tx.clone();
        self.context.with_label("round").spawn(move |context| async move {
            let result = run_to_settlement(&context, &game, &schedule, started_at, |event| {
                publish(&update_tx, event)
            })
            .await;
            if let Err(e) = result {
                tracing::error!("Round failed to settle: {}", e);
            }
        });
        Ok(started)
    }

    pub fn update_subscriber(&self) -> broadcast::Receiver<Event> {
        self.update_tx.subscribe()
    }
}

pub struct Api<E: Clock + Spawner + Metrics> {
    simulator: Arc<Simulator<E>>,
}

impl<E: Clock + Spawner + Metrics> Api<E> {
    pub fn new(simulator: Arc<Simulator<E>>) -> Self {
        Self { simulator }
    }

    /// Routes without middleware.
    pub fn routes(&self) -> Router {
        Router::new()
            .route("/state", get(query_state::<E>))
            .route("/spin", post(submit_spin::<E>))
            .route("/bet", post(submit_bet::<E>))
            .route("/mode", post(submit_mode::<E>))
            .route("/viewport", post(submit_viewport::<E>))
            .route("/updates", get(updates_ws::<E>))
            .with_state(self.simulator.clone())
    }

    pub fn router(&self) -> Router {
        // Configure CORS
        let cors = CorsLayer::new()
            .allow_origin(Any)
            .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
            .allow_headers([header::CONTENT_TYPE]);
        let router = self.routes().layer(cors);

        // Configure Rate Limiting
        let Some(governor_conf) = GovernorConfigBuilder::default()
            .per_millisecond(10)
            .burst_size(100)
            .key_extractor(SmartIpKeyExtractor)
            .finish()
        else {
            tracing::warn!("Invalid rate limit configuration, serving without limits");
            return router;
        };
        router.layer(GovernorLayer {
            config: Arc::new(governor_conf),
        })
    }
}

fn encoded(value: impl Encode) -> Response {
    (StatusCode::OK, value.encode().to_vec()).into_response()
}

async fn query_state<E: Clock + Spawner + Metrics>(
    AxumState(simulator): AxumState<Arc<Simulator<E>>>,
) -> Result<Response, Error> {
    Ok(encoded(simulator.snapshot()?))
}

async fn submit_spin<E: Clock + Spawner + Metrics>(
    AxumState(simulator): AxumState<Arc<Simulator<E>>>,
    body: Bytes,
) -> Result<Response, Error> {
    let bet_type = CardType::decode(body.as_ref())?;
    match simulator.spin(bet_type) {
        Ok(event) => Ok(encoded(event)),
        Err(e) => {
            tracing::warn!("Rejected spin: {}", e);
            Err(e)
        }
    }
}

async fn submit_bet<E: Clock + Spawner + Metrics>(
    AxumState(simulator): AxumState<Arc<Simulator<E>>>,
    body: Bytes,
) -> Result<Response, Error> {
    let action = BetAction::decode(body.as_ref())?;
    Ok(encoded(simulator.apply_bet(action)?))
}

async fn submit_mode<E: Clock + Spawner + Metrics>(
    AxumState(simulator): AxumState<Arc<Simulator<E>>>,
) -> Result<Response, Error> {
    Ok(encoded(simulator.toggle_mode()?))
}

async fn submit_viewport<E: Clock + Spawner + Metrics>(
    AxumState(simulator): AxumState<Arc<Simulator<E>>>,
    body: Bytes,
) -> Result<Response, Error> {
    let viewport = Viewport::decode(body.as_ref())?;
    let count = simulator.set_viewport(viewport)?;
    Ok(encoded(count as u64))
}

async fn updates_ws<E: Clock + Spawner + Metrics>(
    AxumState(simulator): AxumState<Arc<Simulator<E>>>,
    ws: WebSocketUpgrade,
) -> impl IntoResponse {
    ws.on_upgrade(move |socket| handle_updates_ws(socket, simulator))
}

async fn handle_updates_ws<E: Clock + Spawner + Metrics>(
    socket: axum::extract::ws::WebSocket,
    simulator: Arc<Simulator<E>>,
) {
    tracing::info!("Updates WebSocket connected");
    let (mut sender, mut receiver) = socket.split();
    let mut updates = simulator.update_subscriber();

    loop {
        tokio::select! {
            msg = receiver.next() => {
                match msg {
                    Some(Ok(axum::extract::ws::Message::Close(_))) => {
                        tracing::info!("Client closed WebSocket connection");
                        break;
                    }
                    Some(Ok(axum::extract::ws::Message::Ping(data))) => {
                        if sender.send(axum::extract::ws::Message::Pong(data)).await.is_err() {
                            tracing::warn!("Failed to send pong, client disconnected");
                            break;
                        }
                    }
                    Some(Err(e)) => {
                        tracing::warn!("WebSocket error: {:?}", e);
                        break;
                    }
                    None => {
                        tracing::info!("WebSocket stream ended");
                        break;
                    }
                    _ => {}
                }
            }
            update = updates.recv() => {
                match update {
                    Ok(event) => {
                        tracing::debug!(round = event.round(), "Sending event to WebSocket client");
                        if sender
                            .send(axum::extract::ws::Message::Binary(event.encode().to_vec()))
                            .await
                            .is_err()
                        {
                            tracing::warn!("Failed to send event, client disconnected");
                            break;
                        }
                    }
                    Err(broadcast::error::RecvError::Lagged(skipped)) => {
                        tracing::warn!("WebSocket client lagged behind, skipped {} events", skipped);
                    }
                    Err(broadcast::error::RecvError::Closed) => {
                        tracing::info!("Broadcast channel closed");
                        break;
                    }
                }
            }
        }
    }
    let _ = sender.close().await;
}
