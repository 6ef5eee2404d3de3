use std::sync::Arc;
use std::time::Duration;

use sqlx::PgPool;

use crate::core::{config::Settings, rate_limit::RateLimiter};

#[derive(Clone)]
pub(crate) struct AppState {
    inner: Arc<InnerState>,
}

struct InnerState {
    settings: Settings,
    db: PgPool,
    auth_limiter: RateLimiter,
}

impl AppState {
    pub(crate) fn new(settings: Settings, db: PgPool) -> Self {
        let auth_limiter = RateLimiter::new(
            settings.security().auth_rate_limit,
            Duration::from_secs(settings.security().auth_rate_window_seconds),
        );
        Self { inner: Arc::new(InnerState { settings, db, auth_limiter }) }
    }

    pub(crate) fn settings(&self) -> &Settings {
        &self.inner.settings
    }

    pub(crate) fn db(&self) -> &PgPool {
        &self.inner.db
    }

    pub(crate) fn auth_limiter(&self) -> &RateLimiter {
        &self.inner.auth_limiter
    }
}
