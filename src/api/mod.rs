pub mod client;
pub mod interceptor;
pub mod request;
pub mod response;

pub use client::{ApiClient, ApiClientBuilder, RequestBuilder};
pub use interceptor::{FailureDisposition, RequestInterceptor, ResponseInterceptor};
pub use request::RequestContext;
pub use response::ApiResponse;

use crate::error::Result;
use serde_json::Value;

/// Path of the backend logout endpoint, relative to the base URL.
pub const LOGOUT_PATH: &str = "auth/logout";

/// Tell the backend to end the session. A 401 here never raises the
/// unauthorized notification.
pub async fn logout(client: &ApiClient) -> Result<Value> {
    client.post(LOGOUT_PATH).send().await?.json_value()
}
