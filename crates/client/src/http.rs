//! HTTP plumbing shared by every endpoint binding.

use std::sync::Arc;

use reqwest::{Method, RequestBuilder, StatusCode};
use serde::Serialize;
use serde::de::DeserializeOwned;
use uuid::Uuid;

use shelfline_auth::Session;

use crate::config::ClientConfig;
use crate::error::{ClientError, extract_detail};
use crate::navigation::Navigator;

const REQUEST_ID_HEADER: &str = "x-request-id";

/// Handle to the backend.
///
/// Cheap to clone; all clones share the connection pool, the session and the
/// navigator.
#[derive(Clone)]
pub struct ApiClient {
    inner: Arc<Inner>,
}

struct Inner {
    http: reqwest::Client,
    base_url: String,
    login_route: String,
    session: Arc<Session>,
    navigator: Arc<dyn Navigator>,
}

impl std::fmt::Debug for ApiClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiClient")
            .field("base_url", &self.inner.base_url)
            .finish_non_exhaustive()
    }
}

impl ApiClient {
    pub fn new(
        config: &ClientConfig,
        session: Arc<Session>,
        navigator: Arc<dyn Navigator>,
    ) -> Result<Self, ClientError> {
        let http = reqwest::Client::builder()
            .timeout(config.request_timeout)
            .build()?;

        Ok(Self {
            inner: Arc::new(Inner {
                http,
                base_url: config.base_url.trim_end_matches('/').to_string(),
                login_route: config.login_route.clone(),
                session,
                navigator,
            }),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.inner.base_url
    }

    pub fn session(&self) -> &Arc<Session> {
        &self.inner.session
    }

    /// Send the user to the login route.
    pub(crate) fn redirect_to_login(&self) {
        self.inner.navigator.redirect(&self.inner.login_route);
    }

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        let url = format!("{}{}", self.inner.base_url, path);
        self.inner.http.request(method, url)
    }

    pub(crate) async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T, ClientError> {
        self.execute(self.request(Method::GET, path), Method::GET, path)
            .await
    }

    pub(crate) async fn post<B, T>(&self, path: &str, body: &B) -> Result<T, ClientError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let req = self.request(Method::POST, path).json(body);
        self.execute(req, Method::POST, path).await
    }

    pub(crate) async fn post_empty<T: DeserializeOwned>(&self, path: &str) -> Result<T, ClientError> {
        self.execute(self.request(Method::POST, path), Method::POST, path)
            .await
    }

    pub(crate) async fn post_multipart<T: DeserializeOwned>(
        &self,
        path: &str,
        form: reqwest::multipart::Form,
    ) -> Result<T, ClientError> {
        let req = self.request(Method::POST, path).multipart(form);
        self.execute(req, Method::POST, path).await
    }

    pub(crate) async fn delete<B, T>(&self, path: &str, body: &B) -> Result<T, ClientError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let req = self.request(Method::DELETE, path).json(body);
        self.execute(req, Method::DELETE, path).await
    }

    async fn execute<T: DeserializeOwned>(
        &self,
        mut req: RequestBuilder,
        method: Method,
        path: &str,
    ) -> Result<T, ClientError> {
        let request_id = Uuid::now_v7().to_string();
        req = req.header(REQUEST_ID_HEADER, &request_id);
        if let Some(token) = self.inner.session.token() {
            req = req.bearer_auth(token);
        }

        let resp = req.send().await.map_err(|err| {
            tracing::warn!(%method, %path, %request_id, error = %err, "request failed");
            ClientError::from(err)
        })?;

        let status = resp.status();
        let body = resp.bytes().await?;
        tracing::debug!(%method, %path, %request_id, status = status.as_u16(), "response");

        if status == StatusCode::UNAUTHORIZED {
            self.handle_unauthorized(path);
            return Err(ClientError::Unauthorized {
                detail: extract_detail(&body),
            });
        }

        if !status.is_success() {
            return Err(ClientError::Api {
                status: status.as_u16(),
                detail: extract_detail(&body),
            });
        }

        // Empty bodies decode as JSON `null` so `()` and `Option<_>` work.
        let payload: &[u8] = if body.iter().all(u8::is_ascii_whitespace) {
            b"null"
        } else {
            &body
        };
        serde_json::from_slice(payload).map_err(|err| {
            tracing::warn!(%method, %path, %request_id, error = %err, "undecodable response body");
            ClientError::Decode(err.to_string())
        })
    }

    /// Any 401 means the token is no good: drop it and force the login screen.
    fn handle_unauthorized(&self, path: &str) {
        tracing::info!(%path, "backend rejected credentials; signing out");
        self.inner.session.clear();
        self.redirect_to_login();
    }
}
