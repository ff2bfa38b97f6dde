use super::interceptor::{RequestInterceptor, ResponseInterceptor};
use super::request::RequestContext;
use super::response::ApiResponse;
use crate::config::ClientConfig;
use crate::error::{ApiError, Result};
use crate::notify::{
    Clock, SystemClock, UnauthorizedEvent, UnauthorizedObserver, UnauthorizedThrottle,
    DEFAULT_COOLDOWN, DEFAULT_VISIBLE_FOR,
};
use crate::session::{NoSession, SessionAccessor};
use reqwest::Method;
use serde::Serialize;
use std::sync::Arc;
use std::time::Duration;

/// HTTP client bound to one backend base URL.
///
/// Every call passes through the outbound stage (auth and locale headers) and,
/// on failure, the inbound stage (401 handling). Clones share the session,
/// throttle and observers.
#[derive(Clone)]
pub struct ApiClient {
    inner: Arc<Inner>,
}

struct Inner {
    http: reqwest::Client,
    base_url: String,
    outbound: RequestInterceptor,
    inbound: ResponseInterceptor,
}

pub struct ApiClientBuilder {
    base_url: String,
    timeout: Option<Duration>,
    session: Arc<dyn SessionAccessor>,
    clock: Arc<dyn Clock>,
    throttle: Option<Arc<UnauthorizedThrottle>>,
    cooldown: Option<Duration>,
    visible_for: Option<Duration>,
    observers: Vec<UnauthorizedObserver>,
    http: Option<reqwest::Client>,
}

impl ApiClientBuilder {
    fn new(base_url: String) -> Self {
        Self {
            base_url,
            timeout: None,
            session: Arc::new(NoSession),
            clock: Arc::new(SystemClock::new()),
            throttle: None,
            cooldown: None,
            visible_for: None,
            observers: Vec::new(),
            http: None,
        }
    }

    pub fn session(mut self, session: Arc<dyn SessionAccessor>) -> Self {
        self.session = session;
        self
    }

    pub fn clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    /// Share an existing throttle, e.g. between several clients.
    pub fn throttle(mut self, throttle: Arc<UnauthorizedThrottle>) -> Self {
        self.throttle = Some(throttle);
        self
    }

    pub fn unauthorized_windows(mut self, cooldown: Duration, visible_for: Duration) -> Self {
        self.cooldown = Some(cooldown);
        self.visible_for = Some(visible_for);
        self
    }

    pub fn on_unauthorized<F>(mut self, observer: F) -> Self
    where
        F: Fn(&UnauthorizedEvent) + Send + Sync + 'static,
    {
        self.observers.push(Arc::new(observer));
        self
    }

    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    pub fn http_client(mut self, http: reqwest::Client) -> Self {
        self.http = Some(http);
        self
    }

    pub fn build(self) -> Result<ApiClient> {
        if self.base_url.is_empty() {
            return Err(ApiError::Config("API base URL is empty".to_string()));
        }

        let http = match self.http {
            Some(http) => http,
            None => {
                let mut builder = reqwest::Client::builder();
                if let Some(timeout) = self.timeout {
                    builder = builder.timeout(timeout);
                }
                builder.build()?
            }
        };

        let throttle = self.throttle.unwrap_or_else(|| {
            Arc::new(UnauthorizedThrottle::new(
                self.cooldown.unwrap_or(DEFAULT_COOLDOWN),
                self.visible_for.unwrap_or(DEFAULT_VISIBLE_FOR),
            ))
        });

        Ok(ApiClient {
            inner: Arc::new(Inner {
                http,
                base_url: self.base_url,
                outbound: RequestInterceptor::new(Arc::clone(&self.session)),
                inbound: ResponseInterceptor::new(self.session, throttle, self.clock, self.observers),
            }),
        })
    }
}

impl ApiClient {
    pub fn builder(base_url: impl Into<String>) -> ApiClientBuilder {
        ApiClientBuilder::new(base_url.into())
    }

    /// Builder preloaded with base URL, timeout and throttle windows.
    pub fn from_config(config: &ClientConfig) -> ApiClientBuilder {
        Self::builder(config.base_url())
            .timeout(config.timeout)
            .unauthorized_windows(config.unauthorized_cooldown, config.unauthorized_visible_for)
    }

    pub fn base_url(&self) -> &str {
        &self.inner.base_url
    }

    pub fn throttle(&self) -> &UnauthorizedThrottle {
        self.inner.inbound.throttle()
    }

    /// Join `path` onto the base URL. Absolute http(s) URLs are kept as they are.
    pub fn resolve_url(&self, path: &str) -> String {
        if path.starts_with("http://") || path.starts_with("https://") {
            return path.to_string();
        }
        let path = path.trim_start_matches('/');
        if path.is_empty() {
            return self.inner.base_url.clone();
        }
        format!("{}/{}", self.inner.base_url.trim_end_matches('/'), path)
    }

    pub fn request(&self, method: Method, path: &str) -> RequestBuilder<'_> {
        RequestBuilder {
            client: self,
            context: RequestContext::new(method, self.resolve_url(path)).with_path(path),
        }
    }

    pub fn get(&self, path: &str) -> RequestBuilder<'_> {
        self.request(Method::GET, path)
    }

    pub fn post(&self, path: &str) -> RequestBuilder<'_> {
        self.request(Method::POST, path)
    }

    pub fn put(&self, path: &str) -> RequestBuilder<'_> {
        self.request(Method::PUT, path)
    }

    pub fn patch(&self, path: &str) -> RequestBuilder<'_> {
        self.request(Method::PATCH, path)
    }

    pub fn delete(&self, path: &str) -> RequestBuilder<'_> {
        self.request(Method::DELETE, path)
    }

    /// Run one request through both stages and the transport.
    pub async fn execute(&self, mut context: RequestContext) -> Result<ApiResponse> {
        self.inner.outbound.apply(&mut context);

        let mut request = self
            .inner
            .http
            .request(context.method.clone(), &context.url)
            .headers(context.headers.clone());
        if !context.query.is_empty() {
            request = request.query(&context.query);
        }
        if let Some(body) = &context.body {
            request = request.json(body);
        }

        let response = match request.send().await {
            Ok(response) => response,
            Err(e) => return Err(self.inner.inbound.on_error(&context, ApiError::Network(e))),
        };

        let status = response.status();
        let headers = response.headers().clone();
        let url = response.url().to_string();
        let body = match response.bytes().await {
            Ok(body) => body,
            Err(e) => return Err(self.inner.inbound.on_error(&context, ApiError::Network(e))),
        };

        if status.is_client_error() || status.is_server_error() {
            tracing::debug!(%status, url = %context.url, "request failed");
            let error = ApiError::Status {
                status,
                method: context.method.clone(),
                url: context.url.clone(),
                headers,
                body,
            };
            return Err(self.inner.inbound.on_error(&context, error));
        }

        Ok(ApiResponse {
            status,
            headers,
            url,
            body,
        })
    }
}

/// Per-call builder returned by [`ApiClient::request`] and the verb helpers.
pub struct RequestBuilder<'a> {
    client: &'a ApiClient,
    context: RequestContext,
}

impl RequestBuilder<'_> {
    pub fn query(mut self, key: &str, value: impl ToString) -> Self {
        self.context.query.push((key.to_string(), value.to_string()));
        self
    }

    pub fn header(mut self, name: &str, value: &str) -> Result<Self> {
        self.context.insert_header(name, value)?;
        Ok(self)
    }

    pub fn json<T: Serialize + ?Sized>(mut self, body: &T) -> Result<Self> {
        self.context.body = Some(serde_json::to_value(body)?);
        Ok(self)
    }

    pub async fn send(self) -> Result<ApiResponse> {
        self.client.execute(self.context).await
    }
}
