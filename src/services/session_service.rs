use std::sync::Arc;

use log::{info, warn};

use super::validation::validate_credentials;
use crate::{
    models::{Credentials, User, ValidationErrors},
    storage::{AUTH_TOKEN_KEY, KeyValueStore},
};

/// Local-only login gate. Any well-formed credentials are accepted; the
/// signed-in user is persisted so the session survives a restart.
pub struct SessionService {
    store: Arc<dyn KeyValueStore>,
    user: Option<User>,
}

impl SessionService {
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self { store, user: None }
    }

    pub fn current_user(&self) -> Option<&User> {
        self.user.as_ref()
    }

    pub fn is_authenticated(&self) -> bool {
        self.user.is_some()
    }

    /// Loads a persisted session. A corrupt token is removed.
    pub fn restore(&mut self) -> Option<User> {
        let token = self.store.get(AUTH_TOKEN_KEY).unwrap_or_else(|e| {
            warn!("Failed to read session: {:#}", e);
            None
        });

        self.user = token.and_then(|token| match serde_json::from_str::<User>(&token) {
            Ok(user) => Some(user),
            Err(e) => {
                warn!("Discarding corrupt session token: {}", e);
                if let Err(e) = self.store.remove(AUTH_TOKEN_KEY) {
                    warn!("Failed to clear session token: {:#}", e);
                }
                None
            }
        });

        self.user.clone()
    }

    pub fn login(&mut self, credentials: &Credentials) -> Result<User, ValidationErrors> {
        validate_credentials(credentials)?;

        let name = credentials
            .email
            .split('@')
            .next()
            .filter(|local| !local.is_empty())
            .map(str::to_string);
        let user = User::new(String::from("1"), credentials.email.clone(), name);

        match serde_json::to_string(&user) {
            Ok(token) => {
                if let Err(e) = self.store.set(AUTH_TOKEN_KEY, &token) {
                    warn!("Failed to persist session: {:#}", e);
                }
            }
            Err(e) => warn!("Failed to serialize session: {}", e),
        }

        info!("Signed in as {}", user.email());
        self.user = Some(user.clone());
        Ok(user)
    }

    pub fn logout(&mut self) {
        if let Some(user) = self.user.take() {
            info!("Signed out {}", user.email());
        }
        if let Err(e) = self.store.remove(AUTH_TOKEN_KEY) {
            warn!("Failed to clear session token: {:#}", e);
        }
    }
}
