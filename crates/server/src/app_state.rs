use engine::SessionState;
use tokio::sync::{broadcast, Mutex};

use crate::auth::GmSessions;

/// Process-wide server state. The session sits behind one mutex so
/// mutations never interleave; `events` fans serialized snapshots out to
/// every open stream.
pub(crate) struct AppState {
    pub(crate) session: Mutex<SessionState>,
    pub(crate) gm_sessions: GmSessions,
    pub(crate) gm_password: String,
    pub(crate) events: broadcast::Sender<String>,
}

impl AppState {
    pub(crate) fn new(gm_password: String) -> Self {
        let (events, _) = broadcast::channel(256);
        Self {
            session: Mutex::new(SessionState::new()),
            gm_sessions: GmSessions::default(),
            gm_password,
            events,
        }
    }
}
