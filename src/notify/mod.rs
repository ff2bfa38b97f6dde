mod clock;
mod throttle;

pub use clock::{Clock, ManualClock, SystemClock};
pub use throttle::{UnauthorizedThrottle, DEFAULT_COOLDOWN, DEFAULT_VISIBLE_FOR};

use reqwest::Method;
use std::sync::Arc;

/// Raised when an authenticated request was rejected with 401 and the
/// throttle allowed a user-facing notification.
#[derive(Debug, Clone)]
pub struct UnauthorizedEvent {
    pub method: Method,
    pub url: String,
    pub at_ms: u64,
}

pub type UnauthorizedObserver = Arc<dyn Fn(&UnauthorizedEvent) + Send + Sync>;
