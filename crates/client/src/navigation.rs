//! Seam for "send the user to another screen".

use std::sync::Mutex;

/// Receives forced navigations (e.g. to the login route after a 401).
pub trait Navigator: Send + Sync {
    fn redirect(&self, route: &str);
}

/// Logs the redirect and does nothing else. Used by headless front ends.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopNavigator;

impl Navigator for NoopNavigator {
    fn redirect(&self, route: &str) {
        tracing::info!(%route, "navigation requested");
    }
}

/// Remembers every redirect, newest last.
#[derive(Debug, Default)]
pub struct RecordingNavigator {
    visits: Mutex<Vec<String>>,
}

impl RecordingNavigator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn visits(&self) -> Vec<String> {
        self.visits.lock().map(|v| v.clone()).unwrap_or_default()
    }

    pub fn last(&self) -> Option<String> {
        self.visits.lock().ok().and_then(|v| v.last().cloned())
    }
}

impl Navigator for RecordingNavigator {
    fn redirect(&self, route: &str) {
        if let Ok(mut visits) = self.visits.lock() {
            visits.push(route.to_string());
        }
    }
}
