use contracts::system::auth::{AuthResponse, User};
use leptos::prelude::*;

use super::storage::{auth_target, restore, AdminAccess, AuthState};
use crate::shared::storage::PersistTarget;

/// Reactive session shared through context; persisted under `auth-storage`
#[derive(Clone, Copy)]
pub struct AuthStore {
    state: RwSignal<AuthState>,
    persist: StoredValue<PersistTarget, LocalStorage>,
}

impl AuthStore {
    pub fn new(persist: PersistTarget) -> Self {
        Self {
            state: RwSignal::new(restore(&persist)),
            persist: StoredValue::new_local(persist),
        }
    }

    fn mutate(&self, f: impl FnOnce(&mut AuthState)) {
        self.state.update(f);
        self.state
            .with_untracked(|state| self.persist.with_value(|p| p.save(state)));
    }

    pub fn set_auth(&self, token: &str, user: User) {
        self.mutate(|s| {
            s.set_auth(token, user);
        });
    }

    pub fn accept(&self, response: AuthResponse) {
        self.set_auth(&response.token, response.user);
    }

    pub fn clear_auth(&self) {
        self.mutate(AuthState::clear_auth);
    }

    pub fn is_authenticated(&self) -> bool {
        self.state.with(|s| s.is_authenticated)
    }

    pub fn is_admin(&self) -> bool {
        self.state.with(AuthState::is_admin)
    }

    pub fn admin_access(&self) -> AdminAccess {
        self.state.with(AuthState::admin_access)
    }

    pub fn user(&self) -> Option<User> {
        self.state.with(|s| s.user.clone())
    }
}

/// Auth context provider component
#[component]
pub fn AuthProvider(children: Children) -> impl IntoView {
    let store = AuthStore::new(auth_target());
    log::debug!("auth: restored session, signed in = {}", store.is_authenticated());
    provide_context(store);

    children()
}

/// Hook to access auth state
pub fn use_auth() -> AuthStore {
    use_context::<AuthStore>().expect("AuthProvider not found in component tree")
}
