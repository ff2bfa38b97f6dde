use super::request::RequestContext;
use crate::error::ApiError;
use crate::notify::{Clock, UnauthorizedEvent, UnauthorizedObserver, UnauthorizedThrottle};
use crate::session::SessionAccessor;
use reqwest::header::{HeaderValue, AUTHORIZATION, CONTENT_LANGUAGE};
use reqwest::StatusCode;
use std::sync::Arc;

/// Outbound stage: attaches bearer token and locale from the session.
#[derive(Clone)]
pub struct RequestInterceptor {
    session: Arc<dyn SessionAccessor>,
}

impl RequestInterceptor {
    pub fn new(session: Arc<dyn SessionAccessor>) -> Self {
        Self { session }
    }

    /// Never fails. Values that cannot be sent as header values are skipped.
    pub fn apply(&self, request: &mut RequestContext) {
        let snapshot = self.session.snapshot();

        if let Some(token) = snapshot.token() {
            match HeaderValue::from_str(&format!("Bearer {}", token)) {
                Ok(mut value) => {
                    value.set_sensitive(true);
                    request.headers.insert(AUTHORIZATION, value);
                }
                Err(_) => tracing::warn!("session token is not a valid header value, skipping"),
            }
        }

        if let Some(locale) = snapshot.locale_code() {
            match HeaderValue::from_str(locale) {
                Ok(value) => {
                    request.headers.insert(CONTENT_LANGUAGE, value);
                }
                Err(_) => tracing::warn!(locale, "locale code is not a valid header value, skipping"),
            }
        }

        tracing::debug!(
            method = %request.method,
            url = %request.url,
            authorized = request.has_authorization_header(),
            locale = snapshot.locale_code().unwrap_or("-"),
            "outbound request"
        );
    }
}

/// What the inbound stage decided for a failed request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureDisposition {
    /// Not a 401, or no response at all.
    PassThrough,
    /// 401 for a request that carried no credentials and no session token.
    Anonymous,
    /// 401 returned by the logout endpoint itself.
    LogoutRequest,
    /// Session was cleared; `notified` tells whether observers were called.
    ForcedLogout { notified: bool },
}

/// Inbound stage: reacts to 401 responses with a forced logout and a throttled
/// notification. The error itself is always handed back unchanged.
#[derive(Clone)]
pub struct ResponseInterceptor {
    session: Arc<dyn SessionAccessor>,
    throttle: Arc<UnauthorizedThrottle>,
    clock: Arc<dyn Clock>,
    observers: Vec<UnauthorizedObserver>,
}

impl ResponseInterceptor {
    pub fn new(
        session: Arc<dyn SessionAccessor>,
        throttle: Arc<UnauthorizedThrottle>,
        clock: Arc<dyn Clock>,
        observers: Vec<UnauthorizedObserver>,
    ) -> Self {
        Self {
            session,
            throttle,
            clock,
            observers,
        }
    }

    pub fn throttle(&self) -> &UnauthorizedThrottle {
        &self.throttle
    }

    /// Run the side effects for `error` and return it to the caller.
    pub fn on_error(&self, request: &RequestContext, error: ApiError) -> ApiError {
        self.inspect(request, &error);
        error
    }

    pub fn inspect(&self, request: &RequestContext, error: &ApiError) -> FailureDisposition {
        if error.status() != Some(StatusCode::UNAUTHORIZED) {
            return FailureDisposition::PassThrough;
        }

        // Read live, not snapshotted per burst: a 401 that follows an earlier
        // forced logout still counts through its own Authorization header.
        let has_token_in_store = self.session.snapshot().has_token();
        let had_auth_header = request.has_authorization_header();

        if request.is_logout_request() {
            tracing::debug!(url = %request.url, "401 from logout request, ignoring");
            return FailureDisposition::LogoutRequest;
        }
        if !has_token_in_store && !had_auth_header {
            tracing::debug!(url = %request.url, "401 for anonymous request, ignoring");
            return FailureDisposition::Anonymous;
        }

        tracing::info!(method = %request.method, url = %request.url, "unauthorized, logging out");
        self.session.logout();

        let now = self.clock.now_ms();
        if !self.throttle.try_acquire(now) {
            tracing::debug!("unauthorized notification throttled");
            return FailureDisposition::ForcedLogout { notified: false };
        }

        self.session.set_unauthorized(true);
        let event = UnauthorizedEvent {
            method: request.method.clone(),
            url: request.url.clone(),
            at_ms: now,
        };
        for observer in &self.observers {
            observer(&event);
        }

        FailureDisposition::ForcedLogout { notified: true }
    }
}
