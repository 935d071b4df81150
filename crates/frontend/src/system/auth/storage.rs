use contracts::system::auth::User;
use serde::{Deserialize, Serialize};

use crate::shared::storage::{BrowserStorage, KeyValueStorage, PersistTarget, AUTH_STORAGE_KEY};

/// Whether the admin area may be shown
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AdminAccess {
    /// Persisted session not read back yet
    Waiting,
    Denied,
    Granted,
}

/// Session as persisted under `auth-storage`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthState {
    #[serde(default)]
    pub token: Option<String>,
    #[serde(default)]
    pub user: Option<User>,
    #[serde(default)]
    pub is_authenticated: bool,
    #[serde(default)]
    pub has_email_config: bool,
    /// Set once the persisted session has been read back
    #[serde(skip)]
    pub hydrated: bool,
}

impl AuthState {
    /// Empty tokens are ignored. Returns whether the session changed.
    pub fn set_auth(&mut self, token: &str, user: User) -> bool {
        let token = token.trim();
        if token.is_empty() {
            log::warn!("auth: ignoring empty token");
            return false;
        }
        self.token = Some(token.to_string());
        self.user = Some(user);
        self.is_authenticated = true;
        true
    }

    pub fn clear_auth(&mut self) {
        let hydrated = self.hydrated;
        *self = Self {
            hydrated,
            ..Self::default()
        };
    }

    pub fn set_email_config(&mut self, has_email_config: bool) {
        self.has_email_config = has_email_config;
    }

    pub fn is_admin(&self) -> bool {
        self.is_authenticated && self.user.as_ref().map(|u| u.is_admin).unwrap_or(false)
    }

    pub fn admin_access(&self) -> AdminAccess {
        if !self.hydrated {
            AdminAccess::Waiting
        } else if self.is_admin() {
            AdminAccess::Granted
        } else {
            AdminAccess::Denied
        }
    }

    pub fn bearer_token(&self) -> Option<&str> {
        self.token.as_deref().filter(|t| self.is_authenticated && !t.is_empty())
    }
}

pub fn auth_target() -> PersistTarget {
    PersistTarget::local(AUTH_STORAGE_KEY, 0)
}

/// Restore the persisted session (or a signed-out one) and mark it hydrated
pub fn restore(target: &PersistTarget) -> AuthState {
    let mut state = target.load::<AuthState>().unwrap_or_default();
    state.hydrated = true;
    state
}

/// Token for outgoing requests, read straight from local storage
pub fn stored_token() -> Option<String> {
    token_from(&BrowserStorage::local())
}

fn token_from(storage: &dyn KeyValueStorage) -> Option<String> {
    crate::shared::storage::load_state::<AuthState>(storage, AUTH_STORAGE_KEY, 0, None)?
        .bearer_token()
        .map(str::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shared::storage::MemoryStorage;
    use std::rc::Rc;

    fn user() -> User {
        serde_json::from_str(r#"{"id":"1","username":"mya","email":"mya@example.com"}"#).unwrap()
    }

    #[test]
    fn test_set_auth_ignores_empty_token() {
        let mut state = AuthState::default();
        assert!(!state.set_auth("  ", user()));
        assert!(!state.is_authenticated);

        assert!(state.set_auth("tok", user()));
        assert!(state.is_authenticated);
        assert_eq!(state.bearer_token(), Some("tok"));
    }

    #[test]
    fn test_clear_auth_keeps_hydrated() {
        let mut state = AuthState {
            hydrated: true,
            ..AuthState::default()
        };
        state.set_auth("tok", user());
        state.set_email_config(true);
        state.clear_auth();

        assert_eq!(state.token, None);
        assert!(!state.has_email_config);
        assert!(state.hydrated);
    }

    #[test]
    fn test_restore_and_token_lookup() {
        let storage = MemoryStorage::new();
        let target = PersistTarget::new(Rc::new(storage.clone()), AUTH_STORAGE_KEY, 0);
        assert!(restore(&target).hydrated);
        assert_eq!(token_from(&storage), None);

        let mut state = AuthState::default();
        state.set_auth("abc", user());
        target.save(&state);

        let restored = restore(&target);
        assert!(restored.hydrated);
        assert_eq!(restored.user.map(|u| u.username), Some("mya".to_string()));
        assert_eq!(token_from(&storage).as_deref(), Some("abc"));
    }

    #[test]
    fn test_admin_flag() {
        let mut admin = user();
        admin.is_admin = true;
        let mut state = AuthState::default();
        assert!(!state.is_admin());
        state.set_auth("t", admin);
        assert!(state.is_admin());
    }

    #[test]
    fn test_admin_access_waits_for_hydration() {
        let mut admin = user();
        admin.is_admin = true;
        let mut state = AuthState::default();
        state.set_auth("t", admin);
        assert_eq!(state.admin_access(), AdminAccess::Waiting);

        state.hydrated = true;
        assert_eq!(state.admin_access(), AdminAccess::Granted);

        state.clear_auth();
        assert_eq!(state.admin_access(), AdminAccess::Denied);
    }

    #[test]
    fn test_signed_in_non_admin_is_denied() {
        let mut state = AuthState {
            hydrated: true,
            ..AuthState::default()
        };
        state.set_auth("t", user());
        assert!(state.is_authenticated);
        assert_eq!(state.admin_access(), AdminAccess::Denied);
    }
}
