use serde::Deserialize;

/// Account created at startup when the users table is empty.
#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct AdminConfig {
    pub name: String,
    pub nickname: String,
    pub phone: String,
    pub email: String,
    pub password: String,
}

impl Default for AdminConfig {
    fn default() -> Self {
        Self {
            name: "admin".to_string(),
            nickname: "Administrator".to_string(),
            phone: "10000000000".to_string(),
            email: "admin@edudesk.local".to_string(),
            password: "change-me-now".to_string(),
        }
    }
}
