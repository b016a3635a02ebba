//! In-process backend for local development and tests.

use super::{Auth, Entity, EntityStore, FieldQuery, FileUpload, SortSpec, UploadFile, UploadedFile};
use crate::error::BackendError;
use crate::types::{Record, Session, User};
use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use dashmap::DashMap;
use serde_json::Value;
use std::cmp::Ordering;
use std::sync::{PoisonError, RwLock};
use uuid::Uuid;

/// Fixed token for the dev user, so a local session survives restarts.
pub const DEV_TOKEN: &str = "tttttttttttttttttttttttttttttttttttttttttttttttttttttttttttttttt";

pub const DEV_USER_EMAIL: &str = "dev@familytable.local";

struct StoreState<F> {
    docs: Vec<Record<F>>,
    last_created: Option<DateTime<Utc>>,
}

/// Documents of one entity type, in insertion order.
pub struct MemoryStore<F> {
    state: RwLock<StoreState<F>>,
}

impl<F: Entity> Default for MemoryStore<F> {
    fn default() -> Self {
        Self::new()
    }
}

impl<F: Entity> MemoryStore<F> {
    pub fn new() -> Self {
        Self {
            state: RwLock::new(StoreState {
                docs: Vec::new(),
                last_created: None,
            }),
        }
    }

    /// Insert a document as-is, keeping its id and metadata.
    pub fn insert(&self, record: Record<F>) {
        let mut state = self.state.write().unwrap_or_else(PoisonError::into_inner);
        state.docs.push(record);
    }

    pub fn len(&self) -> usize {
        self.state
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .docs
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn select(&self, query: Option<&FieldQuery>, sort: &SortSpec) -> Result<Vec<Record<F>>, BackendError> {
        let state = self.state.read().unwrap_or_else(PoisonError::into_inner);

        let mut rows: Vec<(Value, &Record<F>)> = Vec::with_capacity(state.docs.len());
        for doc in &state.docs {
            let value = serde_json::to_value(doc)?;
            if query.is_none_or(|q| q.matches(&value)) {
                rows.push((value, doc));
            }
        }

        rows.sort_by(|(a, _), (b, _)| {
            let ord = compare_fields(a.get(&sort.field), b.get(&sort.field));
            if sort.descending {
                ord.reverse()
            } else {
                ord
            }
        });

        Ok(rows.into_iter().map(|(_, doc)| doc.clone()).collect())
    }

    fn not_found(id: &str) -> BackendError {
        BackendError::NotFound {
            kind: F::KIND,
            id: id.to_string(),
        }
    }
}

/// Orders JSON field values the way the backend's sort does: timestamps by
/// time, numbers numerically, strings lexically, missing values first.
fn compare_fields(a: Option<&Value>, b: Option<&Value>) -> Ordering {
    match (a, b) {
        (Some(Value::Number(x)), Some(Value::Number(y))) => {
            let x = x.as_f64().unwrap_or(0.0);
            let y = y.as_f64().unwrap_or(0.0);
            x.partial_cmp(&y).unwrap_or(Ordering::Equal)
        }
        (Some(Value::String(x)), Some(Value::String(y))) => {
            match (x.parse::<DateTime<Utc>>(), y.parse::<DateTime<Utc>>()) {
                (Ok(x), Ok(y)) => x.cmp(&y),
                _ => x.cmp(y),
            }
        }
        (None, None) => Ordering::Equal,
        (None, Some(_)) => Ordering::Less,
        (Some(_), None) => Ordering::Greater,
        _ => Ordering::Equal,
    }
}

#[async_trait]
impl<F: Entity> EntityStore<F> for MemoryStore<F> {
    async fn list(&self, _session: &Session, sort: &SortSpec) -> Result<Vec<Record<F>>, BackendError> {
        self.select(None, sort)
    }

    async fn filter(
        &self,
        _session: &Session,
        query: &FieldQuery,
        sort: &SortSpec,
    ) -> Result<Vec<Record<F>>, BackendError> {
        self.select(Some(query), sort)
    }

    async fn create(&self, session: &Session, fields: &F) -> Result<Record<F>, BackendError> {
        let mut state = self.state.write().unwrap_or_else(PoisonError::into_inner);

        // Creation dates are strictly increasing so newest-first is deterministic.
        let mut created_date = Utc::now();
        if let Some(last) = state.last_created {
            if created_date <= last {
                created_date = last + Duration::microseconds(1);
            }
        }
        state.last_created = Some(created_date);

        let record = Record {
            id: Uuid::new_v4().to_string(),
            created_by: session.email().to_string(),
            created_date,
            data: fields.clone(),
        };
        state.docs.push(record.clone());
        Ok(record)
    }

    async fn update(&self, _session: &Session, id: &str, fields: &F) -> Result<Record<F>, BackendError> {
        let mut state = self.state.write().unwrap_or_else(PoisonError::into_inner);
        let doc = state
            .docs
            .iter_mut()
            .find(|d| d.id == id)
            .ok_or_else(|| Self::not_found(id))?;
        doc.data = fields.clone();
        Ok(doc.clone())
    }

    async fn delete(&self, _session: &Session, id: &str) -> Result<(), BackendError> {
        let mut state = self.state.write().unwrap_or_else(PoisonError::into_inner);
        let before = state.docs.len();
        state.docs.retain(|d| d.id != id);
        if state.docs.len() == before {
            return Err(Self::not_found(id));
        }
        Ok(())
    }
}

/// Token-to-user table.
#[derive(Debug)]
pub struct MemoryAuth {
    users: DashMap<String, User>,
    login_base: String,
}

impl Default for MemoryAuth {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryAuth {
    pub fn new() -> Self {
        Self {
            users: DashMap::new(),
            login_base: "http://localhost:3000".to_string(),
        }
    }

    pub fn with_user(self, token: &str, user: User) -> Self {
        self.add_user(token, user);
        self
    }

    pub fn add_user(&self, token: &str, user: User) {
        self.users.insert(token.to_string(), user);
    }
}

#[async_trait]
impl Auth for MemoryAuth {
    async fn me(&self, token: &str) -> Result<User, BackendError> {
        self.users
            .get(token)
            .map(|user| user.value().clone())
            .ok_or(BackendError::Unauthenticated)
    }

    fn login_url(&self, return_path: &str) -> String {
        login_url(&self.login_base, return_path)
    }

    async fn logout(&self, token: &str) -> Result<(), BackendError> {
        self.users.remove(token);
        Ok(())
    }
}

pub(super) fn login_url(base: &str, return_path: &str) -> String {
    let page = format!("{}/login", base.trim_end_matches('/'));
    match reqwest::Url::parse_with_params(&page, &[("from_url", return_path)]) {
        Ok(url) => url.to_string(),
        Err(_) => page,
    }
}

/// Keeps uploaded bytes keyed by the URL handed back.
#[derive(Debug, Default)]
pub struct MemoryFiles {
    files: DashMap<String, UploadFile>,
}

impl MemoryFiles {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, file_url: &str) -> Option<UploadFile> {
        self.files.get(file_url).map(|file| file.value().clone())
    }
}

#[async_trait]
impl FileUpload for MemoryFiles {
    async fn upload(&self, _session: &Session, file: UploadFile) -> Result<UploadedFile, BackendError> {
        let file_url = format!("memory://uploads/{}/{}", Uuid::new_v4(), file.file_name);
        self.files.insert(file_url.clone(), file);
        Ok(UploadedFile { file_url })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{RecipeFields, StoryFields};

    fn session(email: &str) -> Session {
        Session::new(
            "token",
            User {
                email: email.to_string(),
                full_name: None,
            },
        )
    }

    fn recipe(title: &str, minutes: u32) -> RecipeFields {
        RecipeFields {
            title: title.to_string(),
            full_instructions: "Cook".to_string(),
            estimated_time: minutes,
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn test_create_assigns_metadata() {
        let store = MemoryStore::<RecipeFields>::new();
        let created = store
            .create(&session("a@example.com"), &recipe("Stew", 60))
            .await
            .unwrap();

        assert!(!created.id.is_empty());
        assert_eq!(created.created_by, "a@example.com");
        assert_eq!(store.len(), 1);
    }

    #[tokio::test]
    async fn test_list_sorts() {
        let store = MemoryStore::<RecipeFields>::new();
        let s = session("a@example.com");
        store.create(&s, &recipe("First", 45)).await.unwrap();
        store.create(&s, &recipe("Second", 10)).await.unwrap();
        store.create(&s, &recipe("Third", 30)).await.unwrap();

        let newest = store.list(&s, &SortSpec::newest_first()).await.unwrap();
        let titles: Vec<_> = newest.iter().map(|r| r.data.title.as_str()).collect();
        assert_eq!(titles, vec!["Third", "Second", "First"]);

        let quickest = store
            .list(&s, &SortSpec::parse("estimatedTime"))
            .await
            .unwrap();
        let times: Vec<_> = quickest.iter().map(|r| r.data.estimated_time).collect();
        assert_eq!(times, vec![10, 30, 45]);
    }

    #[tokio::test]
    async fn test_filter_by_field() {
        let store = MemoryStore::<StoryFields>::new();
        let s = session("a@example.com");
        for recipe_id in ["r1", "r2", "r1"] {
            let story = StoryFields {
                recipe_id: recipe_id.to_string(),
                text: "memory".to_string(),
                ..Default::default()
            };
            store.create(&s, &story).await.unwrap();
        }

        let query = FieldQuery::new().eq("recipeId", "r1");
        let found = store.filter(&s, &query, &SortSpec::default()).await.unwrap();
        assert_eq!(found.len(), 2);
    }

    #[tokio::test]
    async fn test_update_replaces_fields_keeps_metadata() {
        let store = MemoryStore::<RecipeFields>::new();
        let s = session("a@example.com");
        let created = store.create(&s, &recipe("Stew", 60)).await.unwrap();

        let updated = store
            .update(&session("b@example.com"), &created.id, &recipe("Better Stew", 50))
            .await
            .unwrap();
        assert_eq!(updated.data.title, "Better Stew");
        assert_eq!(updated.created_by, "a@example.com");
        assert_eq!(updated.created_date, created.created_date);
    }

    #[tokio::test]
    async fn test_missing_documents() {
        let store = MemoryStore::<RecipeFields>::new();
        let s = session("a@example.com");
        assert!(matches!(
            store.delete(&s, "nope").await,
            Err(BackendError::NotFound { kind: "Recipe", .. })
        ));
        assert!(store.get(&s, "nope").await.is_err());

        let created = store.create(&s, &recipe("Stew", 60)).await.unwrap();
        assert_eq!(store.get(&s, &created.id).await.unwrap().id, created.id);
    }

    #[tokio::test]
    async fn test_auth() {
        let auth = MemoryAuth::new().with_user(
            DEV_TOKEN,
            User {
                email: DEV_USER_EMAIL.to_string(),
                full_name: None,
            },
        );
        assert!(auth.is_authenticated(DEV_TOKEN).await);
        assert!(!auth.is_authenticated("other").await);
        assert_eq!(auth.me(DEV_TOKEN).await.unwrap().email, DEV_USER_EMAIL);

        auth.logout(DEV_TOKEN).await.unwrap();
        assert!(matches!(
            auth.me(DEV_TOKEN).await,
            Err(BackendError::Unauthenticated)
        ));
    }

    #[test]
    fn test_login_url_encodes_return_path() {
        assert_eq!(
            login_url("http://localhost:3000/", "/recipes?id=1"),
            "http://localhost:3000/login?from_url=%2Frecipes%3Fid%3D1"
        );
    }

    #[tokio::test]
    async fn test_upload_keeps_bytes() {
        let files = MemoryFiles::new();
        let uploaded = files
            .upload(
                &session("a@example.com"),
                UploadFile {
                    file_name: "pie.jpg".to_string(),
                    content_type: Some("image/jpeg".to_string()),
                    bytes: vec![1, 2, 3],
                },
            )
            .await
            .unwrap();
        assert!(uploaded.file_url.ends_with("/pie.jpg"));
        assert_eq!(files.get(&uploaded.file_url).unwrap().bytes, vec![1, 2, 3]);
    }
}
