use std::sync::RwLock;

use tracing::debug;
use uuid::Uuid;

use banter_client::{ApiError, ConversationService};
use banter_types::{Conversation, Message};

/// Plain state behind the chat store. Mutations live here so the
/// transition rules are testable without any network in sight.
#[derive(Debug, Default)]
pub(crate) struct ChatState {
    pub conversations: Vec<Conversation>,
    pub current: Option<Conversation>,
    pub loading: bool,
}

impl ChatState {
    fn set_conversations(&mut self, conversations: Vec<Conversation>) {
        self.conversations = conversations;
    }

    fn set_current(&mut self, conversation: Option<Conversation>) {
        self.current = conversation;
    }

    /// Newest first.
    fn add_conversation(&mut self, conversation: Conversation) {
        self.conversations.insert(0, conversation);
    }

    /// Also clears the current pointer when it referenced the removed id,
    /// so nothing keeps displaying a deleted conversation.
    fn remove_conversation(&mut self, id: Uuid) {
        self.conversations.retain(|c| c.id != id);
        if self.current.as_ref().is_some_and(|c| c.id == id) {
            self.current = None;
        }
    }

    /// Appends to BOTH copies of the conversation — the current one (when
    /// it matches) and the list entry — keeping their timestamps in sync.
    fn add_message(&mut self, conversation_id: Uuid, message: Message) {
        if let Some(current) = self.current.as_mut() {
            if current.id == conversation_id {
                current.append(message.clone());
            }
        }
        if let Some(entry) = self.conversations.iter_mut().find(|c| c.id == conversation_id) {
            entry.append(message);
        }
    }

    fn update_title(&mut self, conversation_id: Uuid, title: &str) {
        if let Some(entry) = self.conversations.iter_mut().find(|c| c.id == conversation_id) {
            entry.title = title.to_string();
        }
        if let Some(current) = self.current.as_mut() {
            if current.id == conversation_id {
                current.title = title.to_string();
            }
        }
    }

    fn set_loading(&mut self, loading: bool) {
        self.loading = loading;
    }
}

/// The chat store module: conversation list, current conversation, loading
/// flag. Actions call the conversation service, then commit mutations with
/// the server-confirmed entity; failures rethrow the normalized error and
/// leave state untouched (nothing is applied optimistically).
pub struct ChatStore {
    state: RwLock<ChatState>,
    service: ConversationService,
}

impl ChatStore {
    pub fn new(service: ConversationService) -> Self {
        Self {
            state: RwLock::new(ChatState::default()),
            service,
        }
    }

    // -- Getters --

    pub fn conversations(&self) -> Vec<Conversation> {
        self.read().conversations.clone()
    }

    pub fn current_conversation(&self) -> Option<Conversation> {
        self.read().current.clone()
    }

    pub fn is_loading(&self) -> bool {
        self.read().loading
    }

    // -- Actions --

    pub async fn fetch_conversations(&self) -> Result<Vec<Conversation>, ApiError> {
        let conversations = self.service.list().await?;
        self.commit(|s| s.set_conversations(conversations.clone()));
        Ok(conversations)
    }

    /// May display a conversation the list has not fetched yet; the
    /// current pointer deliberately does not require list membership.
    pub async fn load_conversation(&self, id: Uuid) -> Result<Conversation, ApiError> {
        let conversation = self.service.get(id).await?;
        self.commit(|s| s.set_current(Some(conversation.clone())));
        Ok(conversation)
    }

    pub async fn create_conversation(&self, title: &str) -> Result<Conversation, ApiError> {
        let conversation = self.service.create(title).await?;
        debug!("created conversation {}", conversation.id);
        self.commit(|s| {
            s.add_conversation(conversation.clone());
            s.set_current(Some(conversation.clone()));
        });
        Ok(conversation)
    }

    pub async fn delete_conversation(&self, id: Uuid) -> Result<(), ApiError> {
        self.service.delete(id).await?;
        self.commit(|s| s.remove_conversation(id));
        Ok(())
    }

    pub async fn rename_conversation(&self, id: Uuid, title: &str) -> Result<Conversation, ApiError> {
        let conversation = self.service.rename(id, title).await?;
        self.commit(|s| s.update_title(id, &conversation.title));
        Ok(conversation)
    }

    pub async fn send_message(&self, id: Uuid, content: &str) -> Result<Message, ApiError> {
        self.commit(|s| s.set_loading(true));
        let result = self.service.send_message(id, content).await;
        self.commit(|s| s.set_loading(false));

        let message = result?;
        self.commit(|s| s.add_message(id, message.clone()));
        Ok(message)
    }

    // -- Commit helpers --

    fn commit<F: FnOnce(&mut ChatState)>(&self, mutate: F) {
        let mut state = self
            .state
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        mutate(&mut state);
    }

    fn read(&self) -> std::sync::RwLockReadGuard<'_, ChatState> {
        self.state
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}
