// Package detail loading
//
// Every load takes a fresh generation number. A completion is applied only if
// its generation is still the newest one, so a slow response for an old id can
// never overwrite the page that replaced it.

use parking_lot::Mutex;
use std::sync::Arc;
use tracing::{debug, error, info, warn};

use crate::api::{ApiError, TourApi};
use crate::package::Package;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct LoadToken(u64);

#[derive(Debug, Clone, PartialEq)]
pub enum LoadOutcome {
    Loaded(Package),
    NotFound,
    LoadError(String),
}

impl LoadOutcome {
    // A failed load renders exactly like a missing package
    pub fn shows_not_found(&self) -> bool {
        !matches!(self, LoadOutcome::Loaded(_))
    }

    pub fn package(&self) -> Option<&Package> {
        match self {
            LoadOutcome::Loaded(package) => Some(package),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum LoadState {
    Idle,
    Loading { id: String },
    Done(LoadOutcome),
}

#[derive(Debug, Clone, PartialEq)]
pub struct LoadCompletion {
    pub token: LoadToken,
    pub outcome: LoadOutcome,
}

struct LoaderInner {
    generation: u64,
    state: LoadState,
}

pub struct PackageDetailLoader {
    api: Arc<dyn TourApi>,
    inner: Mutex<LoaderInner>,
}

impl PackageDetailLoader {
    pub fn new(api: Arc<dyn TourApi>) -> Self {
        Self {
            api,
            inner: Mutex::new(LoaderInner {
                generation: 0,
                state: LoadState::Idle,
            }),
        }
    }

    /// Fetches `id` once. `on_loaded` runs at most once, only for a package
    /// that is still the current load, and before any newer load can start
    /// applying. Returns `None` when the result was superseded.
    pub async fn load<F>(&self, id: &str, on_loaded: F) -> Option<LoadCompletion>
    where
        F: FnOnce(LoadToken, &Package),
    {
        let token = self.begin(id);

        let outcome = if id.trim().is_empty() {
            warn!("empty package id, skipping fetch");
            LoadOutcome::NotFound
        } else {
            match self.api.fetch_package(id).await {
                Ok(package) => {
                    info!(package_id = %id, title = %package.title, "package loaded");
                    LoadOutcome::Loaded(package)
                }
                Err(ApiError::NotFound) => {
                    warn!(package_id = %id, "package not found");
                    LoadOutcome::NotFound
                }
                Err(err) => {
                    error!(package_id = %id, error = %err, "failed to load package");
                    LoadOutcome::LoadError(err.to_string())
                }
            }
        };

        self.finish(token, outcome, on_loaded)
    }

    pub fn state(&self) -> LoadState {
        self.inner.lock().state.clone()
    }

    pub fn is_current(&self, token: LoadToken) -> bool {
        self.inner.lock().generation == token.0
    }

    // Drops whatever is in flight; its result will be discarded
    pub fn invalidate(&self) {
        let mut inner = self.inner.lock();
        inner.generation += 1;
        inner.state = LoadState::Idle;
    }

    fn begin(&self, id: &str) -> LoadToken {
        let mut inner = self.inner.lock();
        inner.generation += 1;
        inner.state = LoadState::Loading { id: id.to_string() };
        LoadToken(inner.generation)
    }

    fn finish<F>(&self, token: LoadToken, outcome: LoadOutcome, on_loaded: F) -> Option<LoadCompletion>
    where
        F: FnOnce(LoadToken, &Package),
    {
        let mut inner = self.inner.lock();
        if inner.generation != token.0 {
            debug!(
                stale = token.0,
                current = inner.generation,
                "discarding stale package response"
            );
            return None;
        }

        if let LoadOutcome::Loaded(package) = &outcome {
            on_loaded(token, package);
        }
        inner.state = LoadState::Done(outcome.clone());
        Some(LoadCompletion { token, outcome })
    }
}
