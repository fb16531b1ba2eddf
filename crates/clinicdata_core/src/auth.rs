//! Local admin sign-in shortcut.
//!
//! # Responsibility
//! - Produce the boolean admin flag consumed by back-office tooling.
//! - Persist that flag in the on-device key-value medium.
//!
//! # Invariants
//! - Local sign-in requires a configured, non-empty shared secret.
//! - Remote admin mode is handled by the remote identity service; this
//!   gate never grants admin in that mode.
//! - The data layer never consults this flag.

use crate::config::{AdminConfig, AdminMode};
use crate::storage::{KeyValueStore, StorageError, ADMIN_FLAG_KEY};
use log::{info, warn};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::sync::Arc;

const FLAG_SET: &str = "true";

#[derive(Debug)]
pub enum AuthError {
    /// Secret missing from configuration or not matching.
    InvalidSecret,
    /// Account creation is not offered in local admin mode.
    SignUpDisabled,
    /// Admin identity is managed by the remote service.
    RemoteManaged,
    Storage(StorageError),
}

impl Display for AuthError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidSecret => write!(f, "invalid admin secret"),
            Self::SignUpDisabled => write!(f, "sign up disabled in local admin mode"),
            Self::RemoteManaged => {
                write!(f, "admin sign-in is managed by the remote identity service")
            }
            Self::Storage(err) => write!(f, "{err}"),
        }
    }
}

impl Error for AuthError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Storage(err) => Some(err),
            _ => None,
        }
    }
}

impl From<StorageError> for AuthError {
    fn from(value: StorageError) -> Self {
        Self::Storage(value)
    }
}

pub struct AdminGate {
    config: AdminConfig,
    store: Arc<dyn KeyValueStore>,
}

impl AdminGate {
    pub fn new(config: AdminConfig, store: Arc<dyn KeyValueStore>) -> Self {
        Self { config, store }
    }

    /// Grants admin when `secret` matches the configured shared secret.
    pub fn sign_in(&self, secret: &str) -> Result<(), AuthError> {
        if self.config.mode == AdminMode::Remote {
            return Err(AuthError::RemoteManaged);
        }
        let matches = self
            .config
            .secret
            .as_deref()
            .is_some_and(|expected| !expected.is_empty() && expected == secret);
        if !matches {
            warn!("event=admin_sign_in module=auth status=error reason=invalid_secret");
            return Err(AuthError::InvalidSecret);
        }

        self.store.set(ADMIN_FLAG_KEY, FLAG_SET)?;
        info!("event=admin_sign_in module=auth status=ok mode=local");
        Ok(())
    }

    pub fn sign_up(&self) -> Result<(), AuthError> {
        match self.config.mode {
            AdminMode::Local => Err(AuthError::SignUpDisabled),
            AdminMode::Remote => Err(AuthError::RemoteManaged),
        }
    }

    /// Clears the local admin flag. Signing out twice is harmless.
    pub fn sign_out(&self) -> Result<(), AuthError> {
        if self.config.mode == AdminMode::Local {
            self.store.remove(ADMIN_FLAG_KEY)?;
            info!("event=admin_sign_out module=auth status=ok mode=local");
        }
        Ok(())
    }

    pub fn is_admin(&self) -> Result<bool, AuthError> {
        if self.config.mode == AdminMode::Remote {
            return Ok(false);
        }
        Ok(self.store.get(ADMIN_FLAG_KEY)?.as_deref() == Some(FLAG_SET))
    }
}
