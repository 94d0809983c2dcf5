//! Session store: conversation-scoped state keyed by conversation id.
//!
//! - `Storage` is the raw key/value backend (JSON values)
//! - `ConversationProperty<T>` is a typed view of one property of a conversation
//! - `StateAccessor<T>` is the get/set contract dialog code depends on
//!
//! Each conversation only ever touches its own keys, so distinct
//! conversations never contend on the same entry.

use async_trait::async_trait;
use domain::UserProfile;
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::collections::HashMap;
use std::marker::PhantomData;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::debug;

use crate::context::TurnContext;
use crate::error::Result;
use crate::instance::DialogStack;

/// Property name under which the user profile is stored
pub const USER_PROFILE_PROPERTY: &str = "userProfile";

/// Property name under which the dialog stack is stored
pub const DIALOG_STATE_PROPERTY: &str = "dialogState";

/// Key/value backend for conversation state
#[async_trait]
pub trait Storage: Send + Sync {
    async fn read(&self, key: &str) -> Result<Option<Value>>;
    async fn write(&self, key: &str, value: Value) -> Result<()>;
    async fn delete(&self, key: &str) -> Result<()>;
}

/// In-process storage; state lives as long as the process
#[derive(Debug, Default)]
pub struct MemoryStorage {
    items: RwLock<HashMap<String, Value>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored keys
    pub async fn len(&self) -> usize {
        self.items.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.items.read().await.is_empty()
    }
}

#[async_trait]
impl Storage for MemoryStorage {
    async fn read(&self, key: &str) -> Result<Option<Value>> {
        Ok(self.items.read().await.get(key).cloned())
    }

    async fn write(&self, key: &str, value: Value) -> Result<()> {
        self.items.write().await.insert(key.to_string(), value);
        Ok(())
    }

    async fn delete(&self, key: &str) -> Result<()> {
        self.items.write().await.remove(key);
        Ok(())
    }
}

/// Typed get/set of one piece of conversation state
#[async_trait]
pub trait StateAccessor<T>: Send + Sync {
    /// `None` when nothing was stored yet for this conversation
    async fn get(&self, turn: &TurnContext) -> Result<Option<T>>;
    async fn set(&self, turn: &TurnContext, value: T) -> Result<()>;
    async fn delete(&self, turn: &TurnContext) -> Result<()>;
}

/// Accessor for the user profile
pub type ProfileAccessor = dyn StateAccessor<UserProfile>;

/// A named property stored per conversation as JSON
pub struct ConversationProperty<T> {
    storage: Arc<dyn Storage>,
    name: String,
    _marker: PhantomData<fn() -> T>,
}

impl<T> ConversationProperty<T> {
    pub fn new(storage: Arc<dyn Storage>, name: impl Into<String>) -> Self {
        Self {
            storage,
            name: name.into(),
            _marker: PhantomData,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    fn key(&self, turn: &TurnContext) -> String {
        format!("{}/{}", turn.conversation_id(), self.name)
    }
}

#[async_trait]
impl<T> StateAccessor<T> for ConversationProperty<T>
where
    T: Serialize + DeserializeOwned + Send + Sync + 'static,
{
    async fn get(&self, turn: &TurnContext) -> Result<Option<T>> {
        let key = self.key(turn);
        match self.storage.read(&key).await? {
            Some(value) => Ok(Some(serde_json::from_value(value)?)),
            None => Ok(None),
        }
    }

    async fn set(&self, turn: &TurnContext, value: T) -> Result<()> {
        let key = self.key(turn);
        let value = serde_json::to_value(&value)?;
        debug!("Writing {}", key);
        self.storage.write(&key, value).await
    }

    async fn delete(&self, turn: &TurnContext) -> Result<()> {
        let key = self.key(turn);
        self.storage.delete(&key).await
    }
}

/// Conversation-scoped state: the user profile and the dialog stack
#[derive(Clone)]
pub struct ConversationState {
    storage: Arc<dyn Storage>,
}

impl ConversationState {
    pub fn new(storage: Arc<dyn Storage>) -> Self {
        Self { storage }
    }

    /// Typed accessor for any property of a conversation
    pub fn property<T>(&self, name: &str) -> ConversationProperty<T> {
        ConversationProperty::new(self.storage.clone(), name)
    }

    pub fn profile_accessor(&self) -> Arc<ProfileAccessor> {
        Arc::new(self.property::<UserProfile>(USER_PROFILE_PROPERTY))
    }

    /// Load the stack, empty if the conversation never had one
    pub async fn load_stack(&self, turn: &TurnContext) -> Result<DialogStack> {
        let property = self.property::<DialogStack>(DIALOG_STATE_PROPERTY);
        Ok(property.get(turn).await?.unwrap_or_default())
    }

    pub async fn save_stack(&self, turn: &TurnContext, stack: DialogStack) -> Result<()> {
        self.property::<DialogStack>(DIALOG_STATE_PROPERTY)
            .set(turn, stack)
            .await
    }

    /// Forget everything stored for the turn's conversation
    pub async fn clear(&self, turn: &TurnContext) -> Result<()> {
        self.property::<DialogStack>(DIALOG_STATE_PROPERTY)
            .delete(turn)
            .await?;
        self.property::<UserProfile>(USER_PROFILE_PROPERTY)
            .delete(turn)
            .await
    }
}
