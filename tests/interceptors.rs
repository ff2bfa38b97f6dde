use bytes::Bytes;
use market_client::api::{FailureDisposition, RequestContext, RequestInterceptor, ResponseInterceptor};
use market_client::error::ApiError;
use market_client::notify::{
    Clock, ManualClock, UnauthorizedEvent, UnauthorizedObserver, UnauthorizedThrottle,
};
use market_client::session::{MemorySessionStore, NoSession, SessionAccessor};
use reqwest::header::HeaderMap;
use reqwest::{Method, StatusCode};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

struct Harness {
    store: Arc<MemorySessionStore>,
    clock: Arc<ManualClock>,
    notifications: Arc<AtomicUsize>,
    inbound: ResponseInterceptor,
}

fn harness(token: Option<&str>) -> Harness {
    let store = Arc::new(MemorySessionStore::with_session(token, Some("bs")));
    let clock = Arc::new(ManualClock::new(0));
    let notifications = Arc::new(AtomicUsize::new(0));
    let counter = Arc::clone(&notifications);
    let observer: UnauthorizedObserver = Arc::new(move |_: &UnauthorizedEvent| {
        counter.fetch_add(1, Ordering::SeqCst);
    });
    let inbound = ResponseInterceptor::new(
        store.clone(),
        Arc::new(UnauthorizedThrottle::default()),
        clock.clone(),
        vec![observer],
    );
    Harness {
        store,
        clock,
        notifications,
        inbound,
    }
}

fn status_error(status: u16, url: &str) -> ApiError {
    ApiError::Status {
        status: StatusCode::from_u16(status).unwrap(),
        method: Method::GET,
        url: url.to_string(),
        headers: HeaderMap::new(),
        body: Bytes::new(),
    }
}

fn authed_request(url: &str) -> RequestContext {
    let mut request = RequestContext::new(Method::GET, url);
    request.insert_header("Authorization", "Bearer abc").unwrap();
    request
}

#[test]
fn test_injects_token_and_locale() {
    let store = Arc::new(MemorySessionStore::with_session(Some("abc"), Some("bs")));
    let outbound = RequestInterceptor::new(store);
    let mut request = RequestContext::new(Method::GET, "http://api.test/api/listings");

    outbound.apply(&mut request);

    assert_eq!(request.headers["authorization"], "Bearer abc");
    assert_eq!(request.headers["content-language"], "bs");
}

#[test]
fn test_empty_session_sets_no_headers() {
    let outbound = RequestInterceptor::new(Arc::new(MemorySessionStore::new()));
    let mut request = RequestContext::new(Method::GET, "http://api.test/api/listings");

    outbound.apply(&mut request);

    assert!(request.headers.is_empty());
}

#[test]
fn test_no_session_accessor_sets_no_headers() {
    let outbound = RequestInterceptor::new(Arc::new(NoSession));
    let mut request = RequestContext::new(Method::POST, "http://api.test/api/chat");

    outbound.apply(&mut request);

    assert!(request.headers.get("authorization").is_none());
    assert!(request.headers.get("content-language").is_none());
}

#[test]
fn test_empty_token_string_counts_as_absent() {
    let store = Arc::new(MemorySessionStore::with_session(Some(""), Some("en")));
    let outbound = RequestInterceptor::new(store);
    let mut request = RequestContext::new(Method::GET, "http://api.test/api/me");

    outbound.apply(&mut request);

    assert!(request.headers.get("authorization").is_none());
    assert_eq!(request.headers["content-language"], "en");
}

#[test]
fn test_unencodable_token_is_skipped() {
    let store = Arc::new(MemorySessionStore::with_session(Some("bad\ntoken"), None));
    let outbound = RequestInterceptor::new(store);
    let mut request = RequestContext::new(Method::GET, "http://api.test/api/me");

    outbound.apply(&mut request);

    assert!(request.headers.get("authorization").is_none());
}

#[test]
fn test_non_401_passes_through_without_side_effects() {
    let h = harness(Some("abc"));
    let request = authed_request("http://api.test/api/listings");

    let error = h.inbound.on_error(&request, status_error(500, &request.url));

    assert_eq!(error.status(), Some(StatusCode::INTERNAL_SERVER_ERROR));
    assert_eq!(h.store.logout_count(), 0);
    assert_eq!(h.notifications.load(Ordering::SeqCst), 0);
    assert!(h.store.snapshot().has_token());
}

#[test]
fn test_network_error_passes_through() {
    let h = harness(Some("abc"));
    let request = authed_request("http://api.test/api/listings");

    let disposition = h.inbound.inspect(&request, &ApiError::Other("connection reset".into()));

    assert_eq!(disposition, FailureDisposition::PassThrough);
    assert_eq!(h.store.logout_count(), 0);
}

#[test]
fn test_guest_401_is_ignored() {
    let h = harness(None);
    let request = RequestContext::new(Method::GET, "http://api.test/api/listings");

    let error = h.inbound.on_error(&request, status_error(401, &request.url));

    assert!(error.is_unauthorized());
    assert_eq!(h.store.logout_count(), 0);
    assert_eq!(h.notifications.load(Ordering::SeqCst), 0);
    assert!(!h.store.is_unauthorized());
}

#[test]
fn test_logout_request_401_is_ignored_even_with_token() {
    let h = harness(Some("abc"));
    let request = authed_request("http://api.test/api/auth/logout");

    let disposition = h.inbound.inspect(&request, &status_error(401, &request.url));

    assert_eq!(disposition, FailureDisposition::LogoutRequest);
    assert_eq!(h.notifications.load(Ordering::SeqCst), 0);
    assert_eq!(h.store.logout_count(), 0);
}

#[test]
fn test_logout_check_ignores_the_base_url() {
    let h = harness(Some("abc"));
    let mut request =
        RequestContext::new(Method::GET, "http://logout.test/logout-api/profile").with_path("profile");
    request.insert_header("Authorization", "Bearer abc").unwrap();

    let disposition = h.inbound.inspect(&request, &status_error(401, &request.url));

    assert_eq!(disposition, FailureDisposition::ForcedLogout { notified: true });
    assert_eq!(h.notifications.load(Ordering::SeqCst), 1);
}

#[test]
fn test_logout_check_uses_the_request_path() {
    let h = harness(Some("abc"));
    let mut request =
        RequestContext::new(Method::POST, "http://api.test/api/auth/logout").with_path("auth/logout");
    request.insert_header("Authorization", "Bearer abc").unwrap();

    assert!(request.is_logout_request());
    let disposition = h.inbound.inspect(&request, &status_error(401, &request.url));

    assert_eq!(disposition, FailureDisposition::LogoutRequest);
    assert_eq!(h.store.logout_count(), 0);
}

#[test]
fn test_authenticated_401_logs_out_and_notifies() {
    let h = harness(Some("abc"));
    let request = authed_request("http://api.test/api/profile");

    let disposition = h.inbound.inspect(&request, &status_error(401, &request.url));

    assert_eq!(disposition, FailureDisposition::ForcedLogout { notified: true });
    assert_eq!(h.store.logout_count(), 1);
    assert!(!h.store.snapshot().has_token());
    assert_eq!(h.store.snapshot().locale_code(), Some("bs"));
    assert!(h.store.is_unauthorized());
    assert_eq!(h.notifications.load(Ordering::SeqCst), 1);
}

#[test]
fn test_token_in_store_without_header_still_counts() {
    let h = harness(Some("abc"));
    let request = RequestContext::new(Method::GET, "http://external.test/upload");

    let disposition = h.inbound.inspect(&request, &status_error(401, &request.url));

    assert_eq!(disposition, FailureDisposition::ForcedLogout { notified: true });
}

#[test]
fn test_one_notification_per_cooldown_window() {
    let h = harness(Some("abc"));
    let request = authed_request("http://api.test/api/profile");

    h.inbound.on_error(&request, status_error(401, &request.url));
    h.clock.set(2_000);
    h.inbound.on_error(&request, status_error(401, &request.url));
    assert_eq!(h.notifications.load(Ordering::SeqCst), 1);

    h.clock.set(11_000);
    h.inbound.on_error(&request, status_error(401, &request.url));
    assert_eq!(h.notifications.load(Ordering::SeqCst), 2);
}

#[test]
fn test_cooldown_outlasts_visible_flag() {
    let h = harness(Some("abc"));
    let request = authed_request("http://api.test/api/profile");

    h.inbound.on_error(&request, status_error(401, &request.url));
    assert!(h.inbound.throttle().is_visible(0));

    h.clock.advance(Duration::from_millis(3_000));
    assert!(!h.inbound.throttle().is_visible(h.clock.now_ms()));

    h.clock.set(4_000);
    let disposition = h.inbound.inspect(&request, &status_error(401, &request.url));

    assert_eq!(disposition, FailureDisposition::ForcedLogout { notified: false });
    assert_eq!(h.notifications.load(Ordering::SeqCst), 1);
}

#[test]
fn test_lowercase_authorization_header_is_detected() {
    let h = harness(None);
    let mut request = RequestContext::new(Method::GET, "http://api.test/api/profile");
    request.insert_header("authorization", "Bearer abc").unwrap();

    let disposition = h.inbound.inspect(&request, &status_error(401, &request.url));

    assert_eq!(disposition, FailureDisposition::ForcedLogout { notified: true });
    assert_eq!(h.notifications.load(Ordering::SeqCst), 1);
}

#[test]
fn test_burst_after_logout_relies_on_request_header() {
    let h = harness(Some("abc"));
    let first = authed_request("http://api.test/api/profile");
    let second = authed_request("http://api.test/api/listings");

    h.inbound.on_error(&first, status_error(401, &first.url));
    let disposition = h.inbound.inspect(&second, &status_error(401, &second.url));

    assert_eq!(disposition, FailureDisposition::ForcedLogout { notified: false });
    assert_eq!(h.store.logout_count(), 2);
    assert_eq!(h.notifications.load(Ordering::SeqCst), 1);
}
