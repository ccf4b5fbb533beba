//! Operator session state.
//!
//! The portal keeps the signed-in identity in four well-known keys of a
//! key/value store. The store is a trait so tests run on a plain map and
//! an embedding shell can back it with whatever persistence it has.

use std::cell::RefCell;
use std::collections::BTreeMap;

use serde_json::Value;
use tracing::debug;

use crate::api::{ApiGateway, LoginRequest, LoginResponse};
use crate::error::{CoreError, CoreResult};

pub const KEY_USER_ID: &str = "userId";
pub const KEY_USERNAME: &str = "username";
pub const KEY_ROLE: &str = "role";
pub const KEY_LOCATION: &str = "location";

pub trait KeyValueStore {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&self, key: &str, value: &str);
    fn remove(&self, key: &str);
}

/// In-memory store used by tests and the flow checker.
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: RefCell<BTreeMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Option<String> {
        self.entries.borrow().get(key).cloned()
    }

    fn set(&self, key: &str, value: &str) {
        self.entries.borrow_mut().insert(key.to_string(), value.to_string());
    }

    fn remove(&self, key: &str) {
        self.entries.borrow_mut().remove(key);
    }
}

/// Landing screen selected from the stored role after sign-in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LandingRoute {
    Approval,
    Home,
    Assignment,
    Fallback,
}

/// Signed-in identity snapshot, read fresh from the store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Identity {
    pub user_id: String,
    pub username: String,
    pub role: String,
}

pub struct SessionStore<S: KeyValueStore> {
    store: S,
}

impl<S: KeyValueStore> SessionStore<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// Validate credentials, call the collaborator and persist the
    /// returned identity. Validation failures never reach the wire.
    pub fn login<G: ApiGateway>(
        &self,
        gateway: &G,
        username: &str,
        password: &str,
    ) -> CoreResult<LandingRoute> {
        if username.trim().is_empty() {
            return Err(CoreError::InvalidInput("User ID is required".to_string()));
        }
        if password.is_empty() {
            return Err(CoreError::InvalidInput("Password is required".to_string()));
        }
        if password.len() < 6 {
            return Err(CoreError::InvalidInput(
                "Password must be at least 6 characters".to_string(),
            ));
        }
        let response = gateway.login(&LoginRequest {
            username: username.to_string(),
            password: password.to_string(),
        })?;
        self.populate_from_login(&response);
        debug!(user = %response.user.username, role = %response.user.role, "session established");
        Ok(self.landing_route())
    }

    pub fn populate_from_login(&self, response: &LoginResponse) {
        self.store.set(KEY_USER_ID, &response.user.user_id);
        self.store.set(KEY_USERNAME, &response.user.username);
        self.store.set(KEY_ROLE, &response.user.role);
        let location = serde_json::to_string(&response.location)
            .unwrap_or_else(|_| "null".to_string());
        self.store.set(KEY_LOCATION, &location);
    }

    /// Read the identity as stored right now. RCA submission and the
    /// assignment scope both read this at use time, never from a cached
    /// copy.
    pub fn identity(&self) -> Option<Identity> {
        let user_id = self.store.get(KEY_USER_ID)?;
        let username = self.store.get(KEY_USERNAME)?;
        let role = self.store.get(KEY_ROLE)?;
        Some(Identity {
            user_id,
            username,
            role,
        })
    }

    pub fn role(&self) -> Option<String> {
        self.store.get(KEY_ROLE)
    }

    pub fn location(&self) -> Value {
        self.store
            .get(KEY_LOCATION)
            .and_then(|raw| serde_json::from_str(&raw).ok())
            .unwrap_or(Value::Null)
    }

    /// Route by role, case-insensitively. Unknown roles land on the
    /// fallback screen rather than an error.
    pub fn landing_route(&self) -> LandingRoute {
        let role = self.role().unwrap_or_default().to_lowercase();
        match role.as_str() {
            "admin" => LandingRoute::Approval,
            "user" => LandingRoute::Home,
            "assign" => LandingRoute::Assignment,
            _ => LandingRoute::Fallback,
        }
    }

    pub fn clear(&self) {
        self.store.remove(KEY_USER_ID);
        self.store.remove(KEY_USERNAME);
        self.store.remove(KEY_ROLE);
        self.store.remove(KEY_LOCATION);
    }
}
