use axum::extract::FromRef;
use sqlx::PgPool;

use crate::{config::Config, models::Models};

#[derive(Clone)]
pub struct AppState {
    pub models: Models,
    pub config: Config,
}

impl AppState {
    pub fn new(pool: PgPool, config: Config) -> Self {
        Self {
            models: Models::new(pool),
            config,
        }
    }
}

impl FromRef<AppState> for Models {
    fn from_ref(state: &AppState) -> Self {
        state.models.clone()
    }
}

impl FromRef<AppState> for Config {
    fn from_ref(state: &AppState) -> Self {
        state.config.clone()
    }
}
