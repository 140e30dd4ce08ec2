use serde::Deserialize;

/// Application level knobs.
#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Page size used when `ps` is missing or out of range.
    pub default_ps: i64,
    /// Largest page size a client may request.
    pub max_ps: i64,
    /// bcrypt work factor for stored passwords.
    pub bcrypt_cost: u32,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            default_ps: 20,
            max_ps: 100,
            bcrypt_cost: 12,
        }
    }
}
