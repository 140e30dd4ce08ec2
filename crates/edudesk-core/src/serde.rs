use serde::{Deserialize, Deserializer};

/// Deserializes an optional string into an optional i64.
///
/// Query parameters arrive as strings (also inside `#[serde(flatten)]`
/// structs); an empty string is treated as `None`.
pub fn deserialize_optional_i64<'de, D>(deserializer: D) -> Result<Option<i64>, D::Error>
where
    D: Deserializer<'de>,
{
    let opt: Option<String> = Option::deserialize(deserializer)?;
    match opt {
        Some(s) if s.trim().is_empty() => Ok(None),
        Some(s) => s
            .trim()
            .parse::<i64>()
            .map(Some)
            .map_err(serde::de::Error::custom),
        None => Ok(None),
    }
}

/// Deserializes an optional, possibly empty, query string value.
pub fn deserialize_optional_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let opt: Option<String> = Option::deserialize(deserializer)?;
    Ok(opt.filter(|s| !s.trim().is_empty()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Deserialize)]
    struct Query {
        #[serde(default, deserialize_with = "deserialize_optional_i64")]
        id: Option<i64>,
        #[serde(default, deserialize_with = "deserialize_optional_string")]
        q: Option<String>,
    }

    #[test]
    fn test_empty_values_become_none() {
        let query: Query = serde_json::from_str(r#"{"id":"","q":"  "}"#).unwrap();
        assert_eq!(query.id, None);
        assert_eq!(query.q, None);
    }

    #[test]
    fn test_values_are_parsed() {
        let query: Query = serde_json::from_str(r#"{"id":"42","q":"ann"}"#).unwrap();
        assert_eq!(query.id, Some(42));
        assert_eq!(query.q.as_deref(), Some("ann"));
    }

    #[test]
    fn test_missing_fields() {
        let query: Query = serde_json::from_str("{}").unwrap();
        assert_eq!(query.id, None);
        assert_eq!(query.q, None);
    }

    #[test]
    fn test_invalid_number_is_rejected() {
        assert!(serde_json::from_str::<Query>(r#"{"id":"abc"}"#).is_err());
    }
}
