//! Localized validation messages.
//!
//! The locale comes from the `locale` request header (`en` or `zh`), then
//! from `Accept-Language`, and defaults to English. Messages are keyed by
//! the validator error code (`length`, `email`, `phone`, ...).

use std::borrow::Cow;
use std::collections::HashMap;

use axum::http::{HeaderMap, header};
use serde_json::Value;

pub const LOCALE_HEADER: &str = "locale";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Locale {
    #[default]
    En,
    Zh,
}

impl Locale {
    pub fn parse(tag: &str) -> Option<Self> {
        let primary = tag.trim().split(['-', '_']).next()?.to_ascii_lowercase();
        match primary.as_str() {
            "en" => Some(Self::En),
            "zh" => Some(Self::Zh),
            _ => None,
        }
    }

    pub fn from_headers(headers: &HeaderMap) -> Self {
        let explicit = headers
            .get(LOCALE_HEADER)
            .and_then(|v| v.to_str().ok())
            .and_then(Self::parse);
        if let Some(locale) = explicit {
            return locale;
        }

        headers
            .get(header::ACCEPT_LANGUAGE)
            .and_then(|v| v.to_str().ok())
            .and_then(|v| {
                v.split(',')
                    .filter_map(|part| part.split(';').next())
                    .find_map(Self::parse)
            })
            .unwrap_or_default()
    }

    /// Summary message of a validation failure.
    pub fn invalid_params(self) -> &'static str {
        match self {
            Self::En => "invalid request parameters",
            Self::Zh => "请求参数错误",
        }
    }

    pub fn invalid_body(self) -> &'static str {
        match self {
            Self::En => "invalid request body",
            Self::Zh => "请求体格式错误",
        }
    }

    pub fn missing_content_type(self) -> &'static str {
        match self {
            Self::En => "missing 'Content-Type: application/json' header",
            Self::Zh => "缺少 'Content-Type: application/json' 请求头",
        }
    }

    pub fn missing_field(self, field: &str) -> String {
        match self {
            Self::En => format!("{field} is required"),
            Self::Zh => format!("{field}为必填字段"),
        }
    }

    pub fn invalid_type(self) -> &'static str {
        match self {
            Self::En => "invalid field type in request",
            Self::Zh => "请求字段类型错误",
        }
    }

    /// Message for one failed rule on `field`.
    pub fn translate(self, field: &str, code: &str, params: &HashMap<Cow<'static, str>, Value>) -> String {
        let min = params.get("min").map(Value::to_string);
        let max = params.get("max").map(Value::to_string);

        match (self, code) {
            (Self::En, "length") => match (min, max) {
                (Some(min), Some(max)) => format!("{field} must be between {min} and {max} characters"),
                (Some(min), None) => format!("{field} must be at least {min} characters"),
                (None, Some(max)) => format!("{field} must be at most {max} characters"),
                (None, None) => format!("{field} has an invalid length"),
            },
            (Self::Zh, "length") => match (min, max) {
                (Some(min), Some(max)) => format!("{field}长度必须在{min}到{max}个字符之间"),
                (Some(min), None) => format!("{field}长度不能少于{min}个字符"),
                (None, Some(max)) => format!("{field}长度不能超过{max}个字符"),
                (None, None) => format!("{field}长度不合法"),
            },
            (Self::En, "range") => match (min, max) {
                (Some(min), Some(max)) => format!("{field} must be between {min} and {max}"),
                (Some(min), None) => format!("{field} must be at least {min}"),
                (None, Some(max)) => format!("{field} must be at most {max}"),
                (None, None) => format!("{field} is out of range"),
            },
            (Self::Zh, "range") => match (min, max) {
                (Some(min), Some(max)) => format!("{field}必须在{min}到{max}之间"),
                (Some(min), None) => format!("{field}不能小于{min}"),
                (None, Some(max)) => format!("{field}不能大于{max}"),
                (None, None) => format!("{field}超出范围"),
            },
            (Self::En, "email") => format!("{field} must be a valid email address"),
            (Self::Zh, "email") => format!("{field}必须是有效的邮箱地址"),
            (Self::En, "phone") => format!("{field} must be 6 to 20 digits with an optional leading +"),
            (Self::Zh, "phone") => format!("{field}必须是6到20位数字，可带前缀+"),
            (Self::En, "password") => {
                format!("{field} must be empty or between {} and {} characters", min.unwrap_or_default(), max.unwrap_or_default())
            }
            (Self::Zh, "password") => {
                format!("{field}必须为空或长度在{}到{}个字符之间", min.unwrap_or_default(), max.unwrap_or_default())
            }
            (Self::En, "required") => self.missing_field(field),
            (Self::Zh, "required") => self.missing_field(field),
            (Self::En, _) => format!("{field} is invalid"),
            (Self::Zh, _) => format!("{field}不合法"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    fn params(pairs: &[(&'static str, i64)]) -> HashMap<Cow<'static, str>, Value> {
        pairs
            .iter()
            .map(|(k, v)| (Cow::Borrowed(*k), Value::from(*v)))
            .collect()
    }

    #[test]
    fn test_locale_header_wins_over_accept_language() {
        let mut headers = HeaderMap::new();
        headers.insert(LOCALE_HEADER, HeaderValue::from_static("zh"));
        headers.insert(header::ACCEPT_LANGUAGE, HeaderValue::from_static("en-US"));
        assert_eq!(Locale::from_headers(&headers), Locale::Zh);
    }

    #[test]
    fn test_accept_language_and_default() {
        let mut headers = HeaderMap::new();
        assert_eq!(Locale::from_headers(&headers), Locale::En);

        headers.insert(
            header::ACCEPT_LANGUAGE,
            HeaderValue::from_static("fr-FR;q=0.9, zh-CN;q=0.8"),
        );
        assert_eq!(Locale::from_headers(&headers), Locale::Zh);

        headers.insert(LOCALE_HEADER, HeaderValue::from_static("klingon"));
        assert_eq!(Locale::from_headers(&headers), Locale::Zh);
    }

    #[test]
    fn test_length_messages() {
        let p = params(&[("min", 2), ("max", 32)]);
        assert_eq!(
            Locale::En.translate("name", "length", &p),
            "name must be between 2 and 32 characters"
        );
        assert_eq!(
            Locale::Zh.translate("name", "length", &p),
            "name长度必须在2到32个字符之间"
        );
        assert_eq!(
            Locale::En.translate("description", "length", &params(&[("max", 512)])),
            "description must be at most 512 characters"
        );
    }

    #[test]
    fn test_unknown_code_falls_back() {
        assert_eq!(Locale::En.translate("x", "weird", &HashMap::new()), "x is invalid");
        assert_eq!(Locale::Zh.translate("x", "weird", &HashMap::new()), "x不合法");
    }
}
