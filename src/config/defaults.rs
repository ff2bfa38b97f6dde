pub fn default_api_origin() -> String {
    "http://localhost:8000".to_string()
}

pub fn default_api_prefix() -> String {
    "/api".to_string()
}

pub fn default_timeout_secs() -> u64 {
    30
}

pub fn default_cooldown_ms() -> u64 {
    10_000
}

pub fn default_visible_ms() -> u64 {
    3_000
}
