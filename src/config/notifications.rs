use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct NotificationsConfig {
    #[serde(default)]
    pub cooldown_ms: Option<u64>,
    #[serde(default)]
    pub visible_ms: Option<u64>,
}
