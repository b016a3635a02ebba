//! The hosted backend that owns persistence, authentication, and file storage.
//!
//! Everything the application needs from it goes through three traits:
//! [`EntityStore`] per entity type, [`Auth`], and [`FileUpload`]. The
//! [`Backend`] bundle holds one implementation of each and wraps every entity
//! call in a `backend.call` span.

mod config;
mod memory;
mod remote;

pub use config::{
    cache_ttl_from_env, cache_ttl_from_vars, BackendConfig, ConfigError, RemoteConfig,
    DEFAULT_TIMEOUT_SECS,
};
pub use memory::{MemoryAuth, MemoryFiles, MemoryStore, DEV_TOKEN, DEV_USER_EMAIL};
pub use remote::{RemoteAuth, RemoteFiles, RemoteStore};

use crate::error::BackendError;
use crate::types::{MealFields, Record, RecipeFields, Session, StoryFields, User};
use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;
use std::sync::Arc;
use tracing::{info_span, Instrument};

/// Fields of a backend entity type.
pub trait Entity: Serialize + DeserializeOwned + Clone + Send + Sync + 'static {
    /// Collection name on the backend.
    const KIND: &'static str;
}

impl Entity for RecipeFields {
    const KIND: &'static str = "Recipe";
}

impl Entity for MealFields {
    const KIND: &'static str = "Meal";
}

impl Entity for StoryFields {
    const KIND: &'static str = "RecipeStory";
}

/// The backend's sort string: a field name, `-` prefixed for descending.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SortSpec {
    pub field: String,
    pub descending: bool,
}

impl SortSpec {
    pub fn parse(spec: &str) -> Self {
        let spec = spec.trim();
        match spec.strip_prefix('-') {
            Some(field) => Self {
                field: field.to_string(),
                descending: true,
            },
            None => Self {
                field: spec.to_string(),
                descending: false,
            },
        }
    }

    pub fn newest_first() -> Self {
        Self::parse("-created_date")
    }
}

impl Default for SortSpec {
    fn default() -> Self {
        Self::newest_first()
    }
}

impl fmt::Display for SortSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.descending {
            write!(f, "-{}", self.field)
        } else {
            f.write_str(&self.field)
        }
    }
}

/// Exact-match field conditions, ANDed together.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FieldQuery(Map<String, Value>);

impl FieldQuery {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn eq(mut self, field: &str, value: impl Into<Value>) -> Self {
        self.0.insert(field.to_string(), value.into());
        self
    }

    pub fn fields(&self) -> impl Iterator<Item = (&String, &Value)> {
        self.0.iter()
    }

    /// True when every condition equals the document's field.
    pub fn matches(&self, document: &Value) -> bool {
        self.0
            .iter()
            .all(|(field, expected)| document.get(field) == Some(expected))
    }
}

#[async_trait]
pub trait EntityStore<F: Entity>: Send + Sync {
    async fn list(&self, session: &Session, sort: &SortSpec) -> Result<Vec<Record<F>>, BackendError>;

    async fn filter(
        &self,
        session: &Session,
        query: &FieldQuery,
        sort: &SortSpec,
    ) -> Result<Vec<Record<F>>, BackendError>;

    /// Assigns id, owner, and creation date.
    async fn create(&self, session: &Session, fields: &F) -> Result<Record<F>, BackendError>;

    /// Replaces every field of the document.
    async fn update(&self, session: &Session, id: &str, fields: &F) -> Result<Record<F>, BackendError>;

    async fn delete(&self, session: &Session, id: &str) -> Result<(), BackendError>;

    async fn get(&self, session: &Session, id: &str) -> Result<Record<F>, BackendError> {
        let query = FieldQuery::new().eq("id", id);
        self.filter(session, &query, &SortSpec::default())
            .await?
            .into_iter()
            .next()
            .ok_or_else(|| BackendError::NotFound {
                kind: F::KIND,
                id: id.to_string(),
            })
    }
}

#[async_trait]
pub trait Auth: Send + Sync {
    /// The user owning `token`, or `Unauthenticated`.
    async fn me(&self, token: &str) -> Result<User, BackendError>;

    async fn is_authenticated(&self, token: &str) -> bool {
        self.me(token).await.is_ok()
    }

    /// Where to send someone to sign in, coming back to `return_path` afterwards.
    fn login_url(&self, return_path: &str) -> String;

    async fn logout(&self, token: &str) -> Result<(), BackendError>;
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadFile {
    pub file_name: String,
    pub content_type: Option<String>,
    pub bytes: Vec<u8>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UploadedFile {
    pub file_url: String,
}

#[async_trait]
pub trait FileUpload: Send + Sync {
    async fn upload(&self, session: &Session, file: UploadFile) -> Result<UploadedFile, BackendError>;
}

/// Opens a `backend.call` span around each call of the wrapped store.
struct Traced<F: Entity> {
    inner: Arc<dyn EntityStore<F>>,
}

#[async_trait]
impl<F: Entity> EntityStore<F> for Traced<F> {
    async fn list(&self, session: &Session, sort: &SortSpec) -> Result<Vec<Record<F>>, BackendError> {
        self.inner
            .list(session, sort)
            .instrument(info_span!("backend.call", entity = F::KIND, op = "list", sort = %sort))
            .await
    }

    async fn filter(
        &self,
        session: &Session,
        query: &FieldQuery,
        sort: &SortSpec,
    ) -> Result<Vec<Record<F>>, BackendError> {
        self.inner
            .filter(session, query, sort)
            .instrument(info_span!("backend.call", entity = F::KIND, op = "filter", sort = %sort))
            .await
    }

    async fn create(&self, session: &Session, fields: &F) -> Result<Record<F>, BackendError> {
        self.inner
            .create(session, fields)
            .instrument(info_span!("backend.call", entity = F::KIND, op = "create"))
            .await
    }

    async fn update(&self, session: &Session, id: &str, fields: &F) -> Result<Record<F>, BackendError> {
        self.inner
            .update(session, id, fields)
            .instrument(info_span!("backend.call", entity = F::KIND, op = "update", id))
            .await
    }

    async fn delete(&self, session: &Session, id: &str) -> Result<(), BackendError> {
        self.inner
            .delete(session, id)
            .instrument(info_span!("backend.call", entity = F::KIND, op = "delete", id))
            .await
    }

    async fn get(&self, session: &Session, id: &str) -> Result<Record<F>, BackendError> {
        self.inner
            .get(session, id)
            .instrument(info_span!("backend.call", entity = F::KIND, op = "get", id))
            .await
    }
}

fn traced<F: Entity>(inner: Arc<dyn EntityStore<F>>) -> Arc<dyn EntityStore<F>> {
    Arc::new(Traced { inner })
}

/// One implementation of every backend service.
#[derive(Clone)]
pub struct Backend {
    pub recipes: Arc<dyn EntityStore<RecipeFields>>,
    pub meals: Arc<dyn EntityStore<MealFields>>,
    pub stories: Arc<dyn EntityStore<StoryFields>>,
    pub auth: Arc<dyn Auth>,
    pub files: Arc<dyn FileUpload>,
}

impl Backend {
    pub fn new(
        recipes: Arc<dyn EntityStore<RecipeFields>>,
        meals: Arc<dyn EntityStore<MealFields>>,
        stories: Arc<dyn EntityStore<StoryFields>>,
        auth: Arc<dyn Auth>,
        files: Arc<dyn FileUpload>,
    ) -> Self {
        Self {
            recipes: traced(recipes),
            meals: traced(meals),
            stories: traced(stories),
            auth,
            files,
        }
    }

    /// Everything held in process memory. Sessions come from `auth`.
    pub fn in_memory(auth: MemoryAuth) -> Self {
        Self::new(
            Arc::new(MemoryStore::<RecipeFields>::new()),
            Arc::new(MemoryStore::<MealFields>::new()),
            Arc::new(MemoryStore::<StoryFields>::new()),
            Arc::new(auth),
            Arc::new(MemoryFiles::new()),
        )
    }

    pub fn remote(config: &RemoteConfig) -> Result<Self, BackendError> {
        let client = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()?;
        Ok(Self::new(
            Arc::new(RemoteStore::<RecipeFields>::new(client.clone(), config)),
            Arc::new(RemoteStore::<MealFields>::new(client.clone(), config)),
            Arc::new(RemoteStore::<StoryFields>::new(client.clone(), config)),
            Arc::new(RemoteAuth::new(client.clone(), config)),
            Arc::new(RemoteFiles::new(client, config)),
        ))
    }

    pub fn from_config(config: &BackendConfig) -> Result<Self, BackendError> {
        match config {
            BackendConfig::Memory { dev_token } => {
                let auth = MemoryAuth::new().with_user(
                    dev_token,
                    User {
                        email: DEV_USER_EMAIL.to_string(),
                        full_name: Some("Dev Cook".to_string()),
                    },
                );
                Ok(Self::in_memory(auth))
            }
            BackendConfig::Remote(remote) => Self::remote(remote),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_sort_spec() {
        let spec = SortSpec::parse("-created_date");
        assert!(spec.descending);
        assert_eq!(spec.field, "created_date");
        assert_eq!(spec.to_string(), "-created_date");

        let spec = SortSpec::parse("estimatedTime");
        assert!(!spec.descending);
        assert_eq!(spec.to_string(), "estimatedTime");
    }

    #[test]
    fn test_field_query_matches() {
        let query = FieldQuery::new().eq("recipeId", "r1");
        assert!(query.matches(&json!({"recipeId": "r1", "text": "hi"})));
        assert!(!query.matches(&json!({"recipeId": "r2"})));
        assert!(!query.matches(&json!({"text": "hi"})));
        assert!(FieldQuery::new().matches(&json!({})));
    }

    #[test]
    fn test_field_query_serializes_as_object() {
        let query = FieldQuery::new().eq("recipeId", "r1");
        assert_eq!(serde_json::to_string(&query).unwrap(), r#"{"recipeId":"r1"}"#);
    }
}
