//! # Operator Session
//!
//! One logical session per till. Login waits the configured delay (which a
//! teardown can cut short), then checks the password against the configured
//! argon2 hash. The logged-in flag survives restarts under [`AUTH_KEY`].

use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use argon2::password_hash::rand_core::OsRng;
use argon2::password_hash::SaltString;
use argon2::{Argon2, PasswordHash, PasswordHasher, PasswordVerifier};
use gelato_core::validation::validate_password;
use gelato_store::storage::{load_json, save_json};
use gelato_store::{SharedStorage, AUTH_KEY};
use tracing::{debug, info, warn};

use super::delay::{CancelHandle, CancellableDelay, DelayOutcome};
use crate::error::{ApiError, ApiResult};

pub struct SessionState {
    storage: SharedStorage,
    login_delay: Duration,
    password_hash: Option<String>,
    authenticated: AtomicBool,
    teardown: CancelHandle,
}

impl SessionState {
    /// Restores the persisted login flag. Unreadable flags count as logged out.
    pub async fn restore(storage: SharedStorage, login_delay: Duration, password_hash: Option<String>) -> Self {
        let authenticated = match load_json::<bool>(storage.as_ref(), AUTH_KEY).await {
            Ok(flag) => flag.unwrap_or(false),
            Err(e) => {
                warn!(error = %e, "Could not read login flag, starting logged out");
                false
            }
        };
        debug!(authenticated, "Session restored");

        SessionState {
            storage,
            login_delay,
            password_hash,
            authenticated: AtomicBool::new(authenticated),
            teardown: CancelHandle::new(),
        }
    }

    pub fn is_authenticated(&self) -> bool {
        self.authenticated.load(Ordering::SeqCst)
    }

    pub fn require_auth(&self) -> ApiResult<()> {
        if self.is_authenticated() {
            Ok(())
        } else {
            Err(ApiError::unauthorized("Operator is not logged in"))
        }
    }

    pub async fn login(&self, password: &str) -> ApiResult<()> {
        validate_password(password)?;

        if self.delay(self.login_delay).wait().await == DelayOutcome::Cancelled {
            info!("Login cancelled by teardown");
            return Err(ApiError::cancelled("Login"));
        }

        if let Some(hash) = &self.password_hash {
            if !verify_password(password, hash) {
                warn!("Login rejected: wrong password");
                return Err(ApiError::unauthorized("Wrong password"));
            }
        }

        self.authenticated.store(true, Ordering::SeqCst);
        if let Err(e) = save_json(self.storage.as_ref(), AUTH_KEY, &true).await {
            warn!(error = %e, "Failed to persist login flag");
        }

        info!("Operator logged in");
        Ok(())
    }

    pub async fn logout(&self) {
        self.authenticated.store(false, Ordering::SeqCst);
        if let Err(e) = self.storage.remove(AUTH_KEY).await {
            warn!(error = %e, "Failed to clear login flag");
        }
        info!("Operator logged out");
    }

    /// A delay tied to this session's teardown.
    pub fn delay(&self, duration: Duration) -> CancellableDelay {
        self.teardown.delay(duration)
    }

    /// Cancels pending logins and sale completions. Nothing they would have
    /// written is written.
    pub fn teardown(&self) {
        self.teardown.cancel();
    }
}

fn verify_password(password: &str, hash: &str) -> bool {
    let parsed_hash = match PasswordHash::new(hash) {
        Ok(h) => h,
        Err(_) => return false,
    };

    Argon2::default()
        .verify_password(password.as_bytes(), &parsed_hash)
        .is_ok()
}

/// Hashes an operator password for `session.operator_password_hash`.
pub fn hash_password(password: &str) -> ApiResult<String> {
    validate_password(password)?;

    let salt = SaltString::generate(&mut OsRng);
    let hash = Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| ApiError::internal(format!("Failed to hash password: {}", e)))?;

    Ok(hash.to_string())
}
