use std::sync::Mutex;

use crate::config::AppConfig;
use crate::session::SplitSession;

use super::client::SplitApiClient;

/// Shared gateway state.
///
/// One editing session per running instance; the lock serializes writers
/// so every reader observes a fully settled post-mutation record.
pub struct AppState {
    /// External split API (extraction, directory, ledger)
    pub upstream: SplitApiClient,
    /// The single active session record
    session: Mutex<SplitSession>,
}

impl AppState {
    pub fn new(config: &AppConfig) -> Self {
        Self {
            upstream: SplitApiClient::new(&config.upstream),
            session: Mutex::new(SplitSession::default()),
        }
    }

    /// Clone of the settled session record.
    pub fn session(&self) -> SplitSession {
        self.lock().clone()
    }

    /// Commit the next session record, returning a clone of it.
    pub fn commit<F>(&self, reduce: F) -> SplitSession
    where
        F: FnOnce(&SplitSession) -> SplitSession,
    {
        let mut guard = self.lock();
        *guard = reduce(&guard);
        guard.clone()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, SplitSession> {
        // A poisoned lock only means a panic mid-snapshot; the record
        // itself is always a settled value, so recover it.
        self.session.lock().unwrap_or_else(|e| e.into_inner())
    }
}
