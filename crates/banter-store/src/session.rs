use std::sync::{Arc, RwLock};

use tracing::{debug, info, warn};

use banter_client::{ApiError, AuthService};
use banter_storage::{Storage, keys};
use banter_types::api::AuthResponse;
use banter_types::{Session, UserProfile};

/// The session store module: `{anonymous, authenticated}` over user+token.
///
/// Actions call the auth service and commit through the session's mutation
/// functions; the persisted token and serialized profile go through the
/// injected storage, never touched from anywhere else.
pub struct SessionStore {
    state: RwLock<Session>,
    auth: AuthService,
    storage: Arc<dyn Storage>,
}

impl SessionStore {
    /// Restores any persisted session; `check_session` decides at app
    /// start whether the server still honors it.
    pub fn new(auth: AuthService, storage: Arc<dyn Storage>) -> Self {
        let token = storage.read(keys::TOKEN);
        let user = storage
            .read(keys::USER)
            .and_then(|raw| serde_json::from_str(&raw).ok());

        Self {
            state: RwLock::new(Session { user, token }),
            auth,
            storage,
        }
    }

    // -- Getters --

    pub fn is_authenticated(&self) -> bool {
        self.read().is_authenticated()
    }

    pub fn current_user(&self) -> Option<UserProfile> {
        self.read().user.clone()
    }

    pub fn token(&self) -> Option<String> {
        self.read().token.clone()
    }

    // -- Actions --

    pub async fn login(&self, email: &str, password: &str) -> Result<UserProfile, ApiError> {
        let resp = self.auth.login(email, password).await?;
        Ok(self.establish(resp))
    }

    pub async fn register(
        &self,
        email: &str,
        password: &str,
        name: &str,
    ) -> Result<UserProfile, ApiError> {
        let resp = self.auth.register(email, password, name).await?;
        Ok(self.establish(resp))
    }

    /// Local cleanup always runs, even when the remote call fails.
    pub async fn logout(&self) {
        if let Err(e) = self.auth.logout().await {
            warn!("remote logout failed, clearing locally anyway: {}", e);
        }
        self.clear_local();
        info!("signed out");
    }

    /// App-start check: asks the server who the token belongs to. Any
    /// failure means the session is invalid and forces a local clear.
    pub async fn check_session(&self) -> Option<UserProfile> {
        if self.token().is_none() {
            return None;
        }

        match self.auth.current_user().await {
            Ok(user) => {
                if let Ok(raw) = serde_json::to_string(&user) {
                    self.persist(keys::USER, &raw);
                }
                self.commit(|s| s.set_user(Some(user.clone())));
                Some(user)
            }
            Err(e) => {
                debug!("session check failed ({}), clearing", e);
                self.clear_local();
                None
            }
        }
    }

    // -- Commit helpers --

    fn establish(&self, resp: AuthResponse) -> UserProfile {
        self.persist(keys::TOKEN, &resp.token);
        if let Ok(raw) = serde_json::to_string(&resp.user) {
            self.persist(keys::USER, &raw);
        }

        let user = resp.user.clone();
        self.commit(|s| {
            s.set_user(Some(resp.user.clone()));
            s.set_token(Some(resp.token.clone()));
        });
        user
    }

    fn clear_local(&self) {
        self.commit(Session::clear_auth);
        for key in [keys::TOKEN, keys::USER] {
            if let Err(e) = self.storage.remove(key) {
                warn!("failed to clear {} from storage: {}", key, e);
            }
        }
    }

    fn persist(&self, key: &str, value: &str) {
        if let Err(e) = self.storage.write(key, value) {
            warn!("failed to persist {}: {}", key, e);
        }
    }

    fn commit<F: FnOnce(&mut Session)>(&self, mutate: F) {
        let mut state = self
            .state
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        mutate(&mut state);
    }

    fn read(&self) -> std::sync::RwLockReadGuard<'_, Session> {
        self.state
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}
