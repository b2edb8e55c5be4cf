use std::sync::Arc;

use banter_types::UserProfile;
use banter_types::api::{AuthResponse, LoginRequest, RegisterRequest};

use crate::error::ApiError;
use crate::http::ApiClient;

/// Stateless auth operations; persistence of the returned token is the
/// session store's job.
#[derive(Clone)]
pub struct AuthService {
    api: Arc<ApiClient>,
}

impl AuthService {
    pub fn new(api: Arc<ApiClient>) -> Self {
        Self { api }
    }

    pub async fn login(&self, email: &str, password: &str) -> Result<AuthResponse, ApiError> {
        let req = LoginRequest {
            email: email.to_string(),
            password: password.to_string(),
        };
        self.api.post("/auth/login", &req).await
    }

    pub async fn register(
        &self,
        email: &str,
        password: &str,
        name: &str,
    ) -> Result<AuthResponse, ApiError> {
        let req = RegisterRequest {
            email: email.to_string(),
            password: password.to_string(),
            name: name.to_string(),
        };
        self.api.post("/auth/register", &req).await
    }

    pub async fn logout(&self) -> Result<(), ApiError> {
        self.api.post_empty("/auth/logout").await
    }

    pub async fn current_user(&self) -> Result<UserProfile, ApiError> {
        self.api.get("/auth/me").await
    }
}
