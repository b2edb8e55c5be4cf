use std::sync::Arc;

use uuid::Uuid;

use banter_types::api::{CreateConversationRequest, SendMessageRequest, UpdateConversationRequest};
use banter_types::{Conversation, Message};

use crate::error::ApiError;
use crate::http::ApiClient;

/// One round trip per conversation operation; all state lives in the store.
#[derive(Clone)]
pub struct ConversationService {
    api: Arc<ApiClient>,
}

impl ConversationService {
    pub fn new(api: Arc<ApiClient>) -> Self {
        Self { api }
    }

    pub async fn list(&self) -> Result<Vec<Conversation>, ApiError> {
        self.api.get("/conversations").await
    }

    pub async fn get(&self, id: Uuid) -> Result<Conversation, ApiError> {
        self.api.get(&format!("/conversations/{}", id)).await
    }

    pub async fn create(&self, title: &str) -> Result<Conversation, ApiError> {
        let req = CreateConversationRequest {
            title: title.to_string(),
        };
        self.api.post("/conversations", &req).await
    }

    pub async fn rename(&self, id: Uuid, title: &str) -> Result<Conversation, ApiError> {
        let req = UpdateConversationRequest {
            title: title.to_string(),
        };
        self.api.put(&format!("/conversations/{}", id), &req).await
    }

    pub async fn delete(&self, id: Uuid) -> Result<(), ApiError> {
        self.api.delete(&format!("/conversations/{}", id)).await
    }

    pub async fn send_message(&self, id: Uuid, content: &str) -> Result<Message, ApiError> {
        let req = SendMessageRequest {
            content: content.to_string(),
        };
        self.api
            .post(&format!("/conversations/{}/messages", id), &req)
            .await
    }
}
