//! # Session Commands

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::ApiResult;
use crate::state::AppState;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionStatus {
    pub authenticated: bool,
    pub store_name: String,
    pub currency_symbol: String,
    /// Set while some change lives only in memory because saving failed.
    pub storage_error: Option<String>,
}

/// Current login state plus the shop details the header shows.
pub async fn session_status(state: &AppState) -> SessionStatus {
    SessionStatus {
        authenticated: state.session.is_authenticated(),
        store_name: state.config.store.name.clone(),
        currency_symbol: state.config.store.currency_symbol.clone(),
        storage_error: state.storage_error().await,
    }
}

/// Logs the operator in after the configured delay.
///
/// Fails with `VALIDATION_ERROR` on an empty password, `UNAUTHORIZED` on a
/// wrong one and `CANCELLED` when the app is torn down while waiting.
pub async fn login(state: &AppState, password: String) -> ApiResult<SessionStatus> {
    debug!("login command");
    state.session.login(&password).await?;
    Ok(session_status(state).await)
}

pub async fn logout(state: &AppState) -> SessionStatus {
    debug!("logout command");
    state.session.logout().await;
    session_status(state).await
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use gelato_store::MemoryStorage;

    use super::*;
    use crate::commands::test_support::instant_config;
    use crate::error::ErrorCode;

    #[tokio::test]
    async fn test_login_logout_cycle() {
        let state = AppState::new(instant_config(), Arc::new(MemoryStorage::new()), None).await;
        assert!(!session_status(&state).await.authenticated);

        let err = login(&state, String::new()).await.unwrap_err();
        assert_eq!(err.code, ErrorCode::ValidationError);

        let status = login(&state, "1234".into()).await.unwrap();
        assert!(status.authenticated);
        assert_eq!(status.store_name, "Gelato");
        assert_eq!(status.storage_error, None);

        assert!(!logout(&state).await.authenticated);
    }
}
