use std::sync::{Mutex, MutexGuard};
use std::time::Duration;

pub const DEFAULT_COOLDOWN: Duration = Duration::from_millis(10_000);
pub const DEFAULT_VISIBLE_FOR: Duration = Duration::from_millis(3_000);

#[derive(Debug, Default, Clone, Copy)]
struct ThrottleState {
    last_shown_at: Option<u64>,
    visible_until: Option<u64>,
}

/// Rate limiter for the "unauthorized" notification.
///
/// Two independent windows apply. `cooldown` is the minimum distance between
/// two notifications. `visible_for` is how long a shown notification counts as
/// on screen; while visible no new one is shown even if the cooldown has been
/// configured shorter. The visible flag clears once the clock passes its
/// deadline, so no timer task is needed.
#[derive(Debug)]
pub struct UnauthorizedThrottle {
    cooldown: Duration,
    visible_for: Duration,
    state: Mutex<ThrottleState>,
}

impl UnauthorizedThrottle {
    pub fn new(cooldown: Duration, visible_for: Duration) -> Self {
        Self {
            cooldown,
            visible_for,
            state: Mutex::new(ThrottleState::default()),
        }
    }

    pub fn cooldown(&self) -> Duration {
        self.cooldown
    }

    pub fn visible_for(&self) -> Duration {
        self.visible_for
    }

    fn state(&self) -> MutexGuard<'_, ThrottleState> {
        self.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Claim the right to show a notification at `now_ms`.
    ///
    /// Returns true at most once per cooldown window. Check and update happen
    /// under one lock.
    pub fn try_acquire(&self, now_ms: u64) -> bool {
        let mut state = self.state();

        if Self::visible_at(&state, now_ms) {
            return false;
        }
        if let Some(last) = state.last_shown_at {
            if now_ms.saturating_sub(last) < self.cooldown.as_millis() as u64 {
                return false;
            }
        }

        state.last_shown_at = Some(now_ms);
        state.visible_until = Some(now_ms.saturating_add(self.visible_for.as_millis() as u64));
        true
    }

    pub fn is_visible(&self, now_ms: u64) -> bool {
        Self::visible_at(&self.state(), now_ms)
    }

    pub fn last_shown_at(&self) -> Option<u64> {
        self.state().last_shown_at
    }

    pub fn reset(&self) {
        *self.state() = ThrottleState::default();
    }

    fn visible_at(state: &ThrottleState, now_ms: u64) -> bool {
        state.visible_until.is_some_and(|until| now_ms < until)
    }
}

impl Default for UnauthorizedThrottle {
    fn default() -> Self {
        Self::new(DEFAULT_COOLDOWN, DEFAULT_VISIBLE_FOR)
    }
}
