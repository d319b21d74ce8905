use std::{convert::Infallible, net::SocketAddr, sync::Arc, time::Duration};

use axum::{
    extract::State,
    http::{header, HeaderMap, HeaderValue, StatusCode},
    response::{
        sse::{Event, KeepAlive, Sse},
        Html, IntoResponse,
    },
    routing::{get, post},
    Json, Router,
};
use engine::SessionError;
use futures::{stream, Stream, StreamExt};
use shared::{
    error::{ApiError, ErrorCode},
    protocol::{
        CheckAuthResponse, DealInRequest, DeckInfoResponse, IndexRequest, LoginRequest,
        LoginResponse, PlaceholderRequest, RosterRequest, Snapshot, UpdateNameRequest,
        UpdateTraitsRequest,
    },
};
use tokio::sync::broadcast;
use tokio_stream::wrappers::BroadcastStream;
use tracing::{info, warn};

mod app_state;
mod auth;
mod config;

use app_state::AppState;
use config::load_settings;

/// Comment heartbeat interval for otherwise idle streams.
const SSE_KEEPALIVE: Duration = Duration::from_secs(15);

type ApiResult<T> = Result<T, (StatusCode, Json<ApiError>)>;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt().with_env_filter("info").init();

    let settings = load_settings();
    let state = Arc::new(AppState::new(settings.gm_password));
    let app = build_router(state);

    let addr: SocketAddr = settings.bind_addr.parse()?;
    info!(%addr, "initiative tracker listening");
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;
    Ok(())
}

fn build_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/", get(index))
        .route("/stream", get(stream_updates))
        .route("/check_auth", get(check_auth))
        .route("/login", post(login))
        .route("/logout", post(logout))
        .route("/get_participants", get(get_participants))
        .route("/get_initiative", get(get_initiative))
        .route("/deck_info", get(deck_info))
        .route("/new_encounter", post(new_encounter))
        .route("/next_round", post(next_round))
        .route("/reset_deck", post(reset_deck))
        .route("/clear_initiative", post(clear_initiative))
        .route("/remove_participant", post(remove_participant))
        .route("/draw_additional", post(draw_additional))
        .route("/deal_in", post(deal_in))
        .route("/update_name", post(update_name))
        .route("/update_traits", post(update_traits))
        .route("/add_participant_placeholder", post(add_placeholder))
        .with_state(state)
}

async fn index() -> Html<&'static str> {
    Html(include_str!("../assets/index.html"))
}

/// Checks the GM cookie; failed checks reach neither the session nor the
/// broadcast stream.
async fn require_gm(state: &AppState, headers: &HeaderMap) -> ApiResult<()> {
    if auth::is_gm(headers, &state.gm_sessions).await {
        Ok(())
    } else {
        Err((
            StatusCode::FORBIDDEN,
            Json(ApiError::new(
                ErrorCode::Unauthorized,
                "GM authentication required",
            )),
        ))
    }
}

fn reject(err: SessionError) -> (StatusCode, Json<ApiError>) {
    let (status, code) = match err {
        SessionError::AlreadyDealtIn(_) => (StatusCode::CONFLICT, ErrorCode::Conflict),
        SessionError::NameRequired
        | SessionError::DuplicateName(_)
        | SessionError::IndexOutOfRange(_) => (StatusCode::BAD_REQUEST, ErrorCode::Validation),
    };
    (status, Json(ApiError::new(code, err.to_string())))
}

/// Serializes the committed snapshot once, pushes it to every observer, and
/// hands the same snapshot back to the caller. A send error only means no
/// stream is currently open.
fn commit(state: &AppState, snapshot: Snapshot) -> Json<Snapshot> {
    match serde_json::to_string(&snapshot) {
        Ok(payload) => {
            let _ = state.events.send(payload);
        }
        Err(error) => warn!(%error, "failed to serialize snapshot for broadcast"),
    }
    Json(snapshot)
}

/// Enrolls a new observer: subscribes to the broadcast channel first and
/// only then takes the current snapshot. The reverse order can lose a
/// commit that lands in the gap; this order at worst delivers one snapshot
/// twice, and state is always sent whole.
async fn enroll_observer(state: &AppState) -> (broadcast::Receiver<String>, Snapshot) {
    let rx = state.events.subscribe();
    let initial = state.session.lock().await.snapshot();
    (rx, initial)
}

async fn stream_updates(
    State(state): State<Arc<AppState>>,
) -> Sse<impl Stream<Item = Result<Event, Infallible>>> {
    // New observers get the current state immediately, then live updates.
    let (rx, initial) = enroll_observer(&state).await;
    let updates = BroadcastStream::new(rx);

    let first = stream::iter(
        serde_json::to_string(&initial)
            .ok()
            .map(|payload| Ok::<_, Infallible>(Event::default().data(payload))),
    );
    let rest = updates.filter_map(|update| async move {
        // A lagged subscriber just waits for the next snapshot; state is
        // always sent whole.
        update.ok().map(|payload| Ok(Event::default().data(payload)))
    });

    Sse::new(first.chain(rest))
        .keep_alive(KeepAlive::new().interval(SSE_KEEPALIVE).text("ping"))
}

async fn check_auth(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
) -> Json<CheckAuthResponse> {
    Json(CheckAuthResponse {
        is_gm: auth::is_gm(&headers, &state.gm_sessions).await,
    })
}

async fn login(
    State(state): State<Arc<AppState>>,
    Json(req): Json<LoginRequest>,
) -> impl IntoResponse {
    if req.password != state.gm_password {
        return (HeaderMap::new(), Json(LoginResponse { success: false }));
    }
    let token = state.gm_sessions.issue().await;
    let mut headers = HeaderMap::new();
    if let Ok(value) = HeaderValue::from_str(&auth::session_cookie(&token)) {
        headers.insert(header::SET_COOKIE, value);
    }
    (headers, Json(LoginResponse { success: true }))
}

async fn logout(State(state): State<Arc<AppState>>, headers: HeaderMap) -> impl IntoResponse {
    if let Some(token) = auth::session_token(&headers) {
        state.gm_sessions.revoke(&token).await;
    }
    let mut response_headers = HeaderMap::new();
    if let Ok(value) = HeaderValue::from_str(&auth::expired_cookie()) {
        response_headers.insert(header::SET_COOKIE, value);
    }
    (response_headers, Json(LoginResponse { success: true }))
}

async fn get_participants(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
) -> ApiResult<Json<Snapshot>> {
    require_gm(&state, &headers).await?;
    Ok(Json(state.session.lock().await.snapshot()))
}

async fn get_initiative(State(state): State<Arc<AppState>>) -> Json<Snapshot> {
    Json(state.session.lock().await.snapshot())
}

async fn deck_info(State(state): State<Arc<AppState>>) -> Json<DeckInfoResponse> {
    Json(DeckInfoResponse {
        remaining: state.session.lock().await.deck_remaining(),
    })
}

async fn new_encounter(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Json(req): Json<RosterRequest>,
) -> ApiResult<Json<Snapshot>> {
    require_gm(&state, &headers).await?;
    let mut session = state.session.lock().await;
    session.new_encounter(&req.participants).map_err(reject)?;
    Ok(commit(&state, session.snapshot()))
}

async fn next_round(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
) -> ApiResult<Json<Snapshot>> {
    require_gm(&state, &headers).await?;
    let mut session = state.session.lock().await;
    session.next_round();
    Ok(commit(&state, session.snapshot()))
}

async fn reset_deck(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Json(req): Json<RosterRequest>,
) -> ApiResult<Json<Snapshot>> {
    require_gm(&state, &headers).await?;
    let mut session = state.session.lock().await;
    session.reset_deck(&req.participants).map_err(reject)?;
    Ok(commit(&state, session.snapshot()))
}

async fn clear_initiative(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
) -> ApiResult<Json<Snapshot>> {
    require_gm(&state, &headers).await?;
    let mut session = state.session.lock().await;
    session.clear();
    Ok(commit(&state, session.snapshot()))
}

async fn remove_participant(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Json(req): Json<IndexRequest>,
) -> ApiResult<Json<Snapshot>> {
    require_gm(&state, &headers).await?;
    let mut session = state.session.lock().await;
    session.remove(req.index).map_err(reject)?;
    Ok(commit(&state, session.snapshot()))
}

async fn draw_additional(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Json(req): Json<IndexRequest>,
) -> ApiResult<Json<Snapshot>> {
    require_gm(&state, &headers).await?;
    let mut session = state.session.lock().await;
    session.draw_additional(req.index).map_err(reject)?;
    Ok(commit(&state, session.snapshot()))
}

async fn deal_in(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Json(req): Json<DealInRequest>,
) -> ApiResult<Json<Snapshot>> {
    require_gm(&state, &headers).await?;
    let mut session = state.session.lock().await;
    session.deal_in(&req.name, req.traits).map_err(reject)?;
    Ok(commit(&state, session.snapshot()))
}

async fn update_name(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Json(req): Json<UpdateNameRequest>,
) -> ApiResult<Json<Snapshot>> {
    require_gm(&state, &headers).await?;
    let mut session = state.session.lock().await;
    session.update_name(req.index, &req.name).map_err(reject)?;
    Ok(commit(&state, session.snapshot()))
}

async fn update_traits(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Json(req): Json<UpdateTraitsRequest>,
) -> ApiResult<Json<Snapshot>> {
    require_gm(&state, &headers).await?;
    let mut session = state.session.lock().await;
    session
        .update_traits(req.index, req.traits)
        .map_err(reject)?;
    Ok(commit(&state, session.snapshot()))
}

async fn add_placeholder(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Json(req): Json<PlaceholderRequest>,
) -> ApiResult<Json<Snapshot>> {
    require_gm(&state, &headers).await?;
    let mut session = state.session.lock().await;
    session
        .add_placeholder(&req.name, req.traits)
        .map_err(reject)?;
    Ok(commit(&state, session.snapshot()))
}
