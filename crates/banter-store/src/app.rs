use std::sync::Arc;

use tokio::sync::broadcast;

use banter_client::{ApiClient, AuthService, ClientConfig, ConversationService, UploadService};
use banter_storage::Storage;
use banter_types::SessionSignal;

use crate::chat::ChatStore;
use crate::session::SessionStore;

/// The application root state: one explicitly constructed object owning
/// the store modules and the shared HTTP client. Callers pass it (or an
/// `Arc` of it) to whatever needs state — there is no module-scope
/// singleton to import.
pub struct AppState {
    pub session: SessionStore,
    pub chat: ChatStore,
    pub uploads: UploadService,
    client: Arc<ApiClient>,
}

impl AppState {
    pub fn new(config: ClientConfig, storage: Arc<dyn Storage>) -> Self {
        let client = Arc::new(ApiClient::new(config, storage.clone()));

        Self {
            session: SessionStore::new(AuthService::new(client.clone()), storage),
            chat: ChatStore::new(ConversationService::new(client.clone())),
            uploads: UploadService::new(client.clone()),
            client,
        }
    }

    /// Session signals from the HTTP layer (401 expiry) and anything the
    /// shell emits itself (idle timeout).
    pub fn subscribe(&self) -> broadcast::Receiver<SessionSignal> {
        self.client.subscribe()
    }

    pub fn signal(&self, signal: SessionSignal) {
        self.client.emit(signal);
    }
}
