//! The single outbound HTTP pipeline.

use std::sync::Arc;

use reqwest::header::{ACCEPT, HeaderMap, HeaderValue};
use reqwest::{Method, RequestBuilder};
use serde::{Serialize, de::DeserializeOwned};
use tracing::{debug, instrument, trace};

use strove_core::error::TransportError;
use strove_core::{CredentialStore, Error, Navigator, Result};

use crate::config::ClientConfig;
use crate::error::{status_error, transport_error};
use crate::middleware::{BearerAuth, Middleware, SessionExpiry};

/// HTTP client for the Strove API.
///
/// Cheap to clone; clones share the connection pool and the middleware
/// pipeline.
#[derive(Clone)]
pub struct ApiClient {
    inner: Arc<ClientInner>,
}

struct ClientInner {
    http: reqwest::Client,
    config: ClientConfig,
    middleware: Vec<Arc<dyn Middleware>>,
}

impl ApiClient {
    /// Create a client with the standard pipeline: [`BearerAuth`] followed by
    /// [`SessionExpiry`] redirecting to the login route.
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying HTTP client cannot be built.
    pub fn new(
        config: ClientConfig,
        store: CredentialStore,
        navigator: Arc<dyn Navigator>,
    ) -> Result<Self> {
        Self::builder(config)
            .with(BearerAuth::new(store.clone()))
            .with(SessionExpiry::new(store, navigator))
            .build()
    }

    /// Start a client with an empty pipeline.
    pub fn builder(config: ClientConfig) -> ApiClientBuilder {
        ApiClientBuilder {
            config,
            middleware: Vec::new(),
        }
    }

    /// Returns the configuration this client was built with.
    pub fn config(&self) -> &ClientConfig {
        &self.inner.config
    }

    /// GET `path` and decode the JSON body.
    #[instrument(skip(self), fields(base = %self.inner.config.base_url))]
    pub async fn get<R>(&self, path: &str) -> Result<R>
    where
        R: DeserializeOwned,
    {
        debug!(path, "GET");
        self.send_json(self.request(Method::GET, path)).await
    }

    /// GET `path` with query parameters and decode the JSON body.
    #[instrument(skip(self), fields(base = %self.inner.config.base_url))]
    pub async fn get_with_query<Q, R>(&self, path: &str, query: &Q) -> Result<R>
    where
        Q: Serialize + std::fmt::Debug,
        R: DeserializeOwned,
    {
        debug!(path, "GET");
        trace!(?query, "query parameters");
        self.send_json(self.request(Method::GET, path).query(query))
            .await
    }

    /// POST a JSON body to `path` and decode the JSON response.
    #[instrument(skip(self, body), fields(base = %self.inner.config.base_url))]
    pub async fn post<B, R>(&self, path: &str, body: &B) -> Result<R>
    where
        B: Serialize,
        R: DeserializeOwned,
    {
        debug!(path, "POST");
        self.send_json(self.request(Method::POST, path).json(body))
            .await
    }

    /// POST a JSON body to `path` and return the raw response text.
    ///
    /// Used where the caller interprets the body itself and must not fail
    /// on a body that is not the expected shape.
    #[instrument(skip(self, body), fields(base = %self.inner.config.base_url))]
    pub async fn post_text<B>(&self, path: &str, body: &B) -> Result<String>
    where
        B: Serialize,
    {
        debug!(path, "POST");
        let timeout = self.inner.config.timeout;
        let result = async {
            let response = self.dispatch(self.request(Method::POST, path).json(body)).await?;
            response.text().await.map_err(|e| transport_error(e, timeout))
        }
        .await;
        self.finish(result)
    }

    /// DELETE `path` and decode the JSON response.
    #[instrument(skip(self), fields(base = %self.inner.config.base_url))]
    pub async fn delete<R>(&self, path: &str) -> Result<R>
    where
        R: DeserializeOwned,
    {
        debug!(path, "DELETE");
        self.send_json(self.request(Method::DELETE, path)).await
    }

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        let url = self.inner.config.base_url.endpoint(path);
        self.inner.http.request(method, url)
    }

    async fn send_json<R: DeserializeOwned>(&self, builder: RequestBuilder) -> Result<R> {
        let timeout = self.inner.config.timeout;
        let result = async {
            let response = self.dispatch(builder).await?;
            response
                .json::<R>()
                .await
                .map_err(|e| transport_error(e, timeout))
        }
        .await;
        self.finish(result)
    }

    /// Run the request hooks, send, and turn non-2xx statuses into errors.
    async fn dispatch(&self, builder: RequestBuilder) -> Result<reqwest::Response> {
        let timeout = self.inner.config.timeout;
        let mut request = builder.build().map_err(|e| transport_error(e, timeout))?;

        for middleware in &self.inner.middleware {
            middleware.on_request(&mut request)?;
        }

        let method = request.method().clone();
        let url = request.url().clone();
        let response = self
            .inner
            .http
            .execute(request)
            .await
            .map_err(|e| transport_error(e, timeout))?;

        let status = response.status();
        trace!(%method, %url, %status, "response");

        if status.is_success() {
            Ok(response)
        } else {
            let body = response.text().await.unwrap_or_default();
            Err(status_error(status.as_u16(), &body))
        }
    }

    /// Let every error hook see a failure, then hand it back unchanged.
    fn finish<T>(&self, result: Result<T>) -> Result<T> {
        if let Err(err) = &result {
            debug!(error = %err, "request failed");
            for middleware in self.inner.middleware.iter().rev() {
                middleware.on_error(err);
            }
        }
        result
    }
}

impl std::fmt::Debug for ApiClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiClient")
            .field("config", &self.inner.config)
            .field("middleware", &self.inner.middleware.len())
            .finish()
    }
}

/// Builder for an [`ApiClient`] with a custom pipeline.
pub struct ApiClientBuilder {
    config: ClientConfig,
    middleware: Vec<Arc<dyn Middleware>>,
}

impl ApiClientBuilder {
    /// Append a middleware to the end of the pipeline.
    pub fn with(mut self, middleware: impl Middleware + 'static) -> Self {
        self.middleware.push(Arc::new(middleware));
        self
    }

    /// Build the client.
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying HTTP client cannot be built.
    pub fn build(self) -> Result<ApiClient> {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));

        let http = reqwest::Client::builder()
            .user_agent(self.config.user_agent.as_str())
            .default_headers(headers)
            .timeout(self.config.timeout)
            .build()
            .map_err(|e| {
                Error::Transport(TransportError::Http {
                    message: format!("failed to build HTTP client: {}", e),
                })
            })?;

        Ok(ApiClient {
            inner: Arc::new(ClientInner {
                http,
                config: self.config,
                middleware: self.middleware,
            }),
        })
    }
}
