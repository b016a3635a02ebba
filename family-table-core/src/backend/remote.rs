//! Client for the hosted backend's REST API.

use super::config::RemoteConfig;
use super::memory::login_url;
use super::{Auth, Entity, EntityStore, FieldQuery, FileUpload, SortSpec, UploadFile, UploadedFile};
use crate::error::BackendError;
use crate::types::{Record, Session, User};
use async_trait::async_trait;
use reqwest::{multipart, Client, RequestBuilder, Response, StatusCode};
use std::marker::PhantomData;

const APP_ID_HEADER: &str = "X-App-Id";

#[derive(Debug, Clone)]
struct Endpoint {
    client: Client,
    base_url: String,
    app_id: String,
}

impl Endpoint {
    fn new(client: Client, config: &RemoteConfig) -> Self {
        Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            app_id: config.app_id.clone(),
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    fn authed(&self, request: RequestBuilder, token: &str) -> RequestBuilder {
        request
            .bearer_auth(token)
            .header(APP_ID_HEADER, &self.app_id)
    }
}

/// Map non-success statuses to errors, keeping the body text for display.
async fn check(response: Response, kind: &'static str, id: Option<&str>) -> Result<Response, BackendError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    match (status, id) {
        (StatusCode::UNAUTHORIZED, _) => Err(BackendError::Unauthenticated),
        (StatusCode::NOT_FOUND, Some(id)) => Err(BackendError::NotFound {
            kind,
            id: id.to_string(),
        }),
        _ => {
            let body = response.text().await.unwrap_or_default();
            tracing::warn!(status = status.as_u16(), kind, "backend request failed");
            Err(BackendError::Status {
                status: status.as_u16(),
                body,
            })
        }
    }
}

async fn decode<T: serde::de::DeserializeOwned>(response: Response) -> Result<T, BackendError> {
    let bytes = response.bytes().await?;
    Ok(serde_json::from_slice(&bytes)?)
}

/// `/entities/{Kind}` collection.
pub struct RemoteStore<F> {
    endpoint: Endpoint,
    _fields: PhantomData<fn() -> F>,
}

impl<F: Entity> RemoteStore<F> {
    pub fn new(client: Client, config: &RemoteConfig) -> Self {
        Self {
            endpoint: Endpoint::new(client, config),
            _fields: PhantomData,
        }
    }

    fn collection_url(&self) -> String {
        self.endpoint.url(&format!("entities/{}", F::KIND))
    }

    fn document_url(&self, id: &str) -> String {
        self.endpoint.url(&format!("entities/{}/{}", F::KIND, id))
    }
}

#[async_trait]
impl<F: Entity> EntityStore<F> for RemoteStore<F> {
    async fn list(&self, session: &Session, sort: &SortSpec) -> Result<Vec<Record<F>>, BackendError> {
        let request = self
            .endpoint
            .client
            .get(self.collection_url())
            .query(&[("sort", sort.to_string())]);
        let response = self.endpoint.authed(request, &session.token).send().await?;
        decode(check(response, F::KIND, None).await?).await
    }

    async fn filter(
        &self,
        session: &Session,
        query: &FieldQuery,
        sort: &SortSpec,
    ) -> Result<Vec<Record<F>>, BackendError> {
        let q = serde_json::to_string(query)?;
        let request = self
            .endpoint
            .client
            .get(self.collection_url())
            .query(&[("sort", sort.to_string()), ("q", q)]);
        let response = self.endpoint.authed(request, &session.token).send().await?;
        decode(check(response, F::KIND, None).await?).await
    }

    async fn create(&self, session: &Session, fields: &F) -> Result<Record<F>, BackendError> {
        let request = self.endpoint.client.post(self.collection_url()).json(fields);
        let response = self.endpoint.authed(request, &session.token).send().await?;
        decode(check(response, F::KIND, None).await?).await
    }

    async fn update(&self, session: &Session, id: &str, fields: &F) -> Result<Record<F>, BackendError> {
        let request = self.endpoint.client.put(self.document_url(id)).json(fields);
        let response = self.endpoint.authed(request, &session.token).send().await?;
        decode(check(response, F::KIND, Some(id)).await?).await
    }

    async fn delete(&self, session: &Session, id: &str) -> Result<(), BackendError> {
        let request = self.endpoint.client.delete(self.document_url(id));
        let response = self.endpoint.authed(request, &session.token).send().await?;
        check(response, F::KIND, Some(id)).await?;
        Ok(())
    }
}

pub struct RemoteAuth {
    endpoint: Endpoint,
}

impl RemoteAuth {
    pub fn new(client: Client, config: &RemoteConfig) -> Self {
        Self {
            endpoint: Endpoint::new(client, config),
        }
    }
}

#[async_trait]
impl Auth for RemoteAuth {
    async fn me(&self, token: &str) -> Result<User, BackendError> {
        let request = self.endpoint.client.get(self.endpoint.url("auth/me"));
        let response = self.endpoint.authed(request, token).send().await?;
        decode(check(response, "User", None).await?).await
    }

    fn login_url(&self, return_path: &str) -> String {
        login_url(&self.endpoint.base_url, return_path)
    }

    async fn logout(&self, token: &str) -> Result<(), BackendError> {
        let request = self.endpoint.client.post(self.endpoint.url("auth/logout"));
        let response = self.endpoint.authed(request, token).send().await?;
        check(response, "User", None).await?;
        Ok(())
    }
}

pub struct RemoteFiles {
    endpoint: Endpoint,
}

impl RemoteFiles {
    pub fn new(client: Client, config: &RemoteConfig) -> Self {
        Self {
            endpoint: Endpoint::new(client, config),
        }
    }
}

#[async_trait]
impl FileUpload for RemoteFiles {
    async fn upload(&self, session: &Session, file: UploadFile) -> Result<UploadedFile, BackendError> {
        let mut part = multipart::Part::bytes(file.bytes).file_name(file.file_name);
        if let Some(content_type) = file.content_type.as_deref() {
            part = part.mime_str(content_type)?;
        }
        let form = multipart::Form::new().part("file", part);

        let request = self
            .endpoint
            .client
            .post(self.endpoint.url("integrations/Core/UploadFile"))
            .multipart(form);
        let response = self.endpoint.authed(request, &session.token).send().await?;
        decode(check(response, "File", None).await?).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::RecipeFields;
    use std::time::Duration;

    fn config() -> RemoteConfig {
        RemoteConfig {
            base_url: "https://api.example.com/v1/".to_string(),
            app_id: "family-table".to_string(),
            timeout: Duration::from_secs(5),
        }
    }

    #[test]
    fn test_entity_urls() {
        let store = RemoteStore::<RecipeFields>::new(Client::new(), &config());
        assert_eq!(
            store.collection_url(),
            "https://api.example.com/v1/entities/Recipe"
        );
        assert_eq!(
            store.document_url("abc"),
            "https://api.example.com/v1/entities/Recipe/abc"
        );
    }

    #[test]
    fn test_remote_login_url() {
        let auth = RemoteAuth::new(Client::new(), &config());
        assert_eq!(
            auth.login_url("/meals"),
            "https://api.example.com/v1/login?from_url=%2Fmeals"
        );
    }

    #[test]
    fn test_request_carries_token_and_app_id() {
        let endpoint = Endpoint::new(Client::new(), &config());
        let request = endpoint
            .authed(endpoint.client.get(endpoint.url("auth/me")), "secret")
            .build()
            .unwrap();
        assert_eq!(request.headers()["authorization"], "Bearer secret");
        assert_eq!(request.headers()[APP_ID_HEADER], "family-table");
    }
}
