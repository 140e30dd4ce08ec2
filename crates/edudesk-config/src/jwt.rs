use serde::Deserialize;

#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct JwtConfig {
    pub secret: String,
    pub issuer: String,
    /// Access token lifetime in seconds.
    pub expire_secs: i64,
}

impl Default for JwtConfig {
    fn default() -> Self {
        Self {
            secret: "your-secret-key-change-in-production".to_string(),
            issuer: "edudesk".to_string(),
            expire_secs: 86_400,
        }
    }
}
