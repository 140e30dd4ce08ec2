//! Request extractors that reject into the `{meta, data}` envelope.
//!
//! [`ValidatedJson`] deserializes and validates a body, translating every
//! failing rule with the request [`Locale`]. [`QueryParams`] and [`PathId`]
//! wrap the axum extractors so their rejections become `BadRequest`.

use axum::{
    Json,
    extract::{FromRequest, FromRequestParts, Path, Query, Request, rejection::JsonRejection},
    http::request::Parts,
};
use serde::de::DeserializeOwned;
use validator::{Validate, ValidationErrors};

use edudesk_core::AppError;

use crate::i18n::Locale;

/// One localized message per failing rule, ordered by field name.
pub fn format_errors(errors: &ValidationErrors, locale: Locale) -> Vec<String> {
    let mut fields: Vec<_> = errors.field_errors().into_iter().collect();
    fields.sort_by(|a, b| a.0.cmp(&b.0));

    fields
        .into_iter()
        .flat_map(|(field, errors)| {
            errors
                .iter()
                .map(move |error| locale.translate(&field, &error.code, &error.params))
        })
        .collect()
}

/// Runs `value.validate()` and maps failures to a localized `BadRequest`.
pub fn validate_with_locale<T: Validate>(value: &T, locale: Locale) -> Result<(), AppError> {
    value.validate().map_err(|errors| {
        AppError::validation(locale.invalid_params(), format_errors(&errors, locale))
    })
}

fn request_locale(parts_locale: Option<&Locale>, headers: &axum::http::HeaderMap) -> Locale {
    parts_locale
        .copied()
        .unwrap_or_else(|| Locale::from_headers(headers))
}

fn json_rejection(rejection: JsonRejection, locale: Locale) -> AppError {
    let error_msg = rejection.body_text();

    if let Some(field) = error_msg
        .split("missing field `")
        .nth(1)
        .and_then(|s| s.split('`').next())
    {
        let message = locale.missing_field(field);
        return AppError::validation(locale.invalid_params(), vec![message]);
    }

    if error_msg.contains("invalid type") || error_msg.contains("unknown variant") {
        return AppError::bad_request(locale.invalid_type());
    }

    if matches!(rejection, JsonRejection::MissingJsonContentType(_)) {
        return AppError::bad_request(locale.missing_content_type());
    }

    AppError::bad_request(locale.invalid_body())
}

#[derive(Debug, Clone, Copy, Default)]
pub struct ValidatedJson<T>(pub T);

impl<T, S> FromRequest<S> for ValidatedJson<T>
where
    T: DeserializeOwned + Validate,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let locale = request_locale(req.extensions().get::<Locale>(), req.headers());

        let Json(value) = Json::<T>::from_request(req, state)
            .await
            .map_err(|rejection| json_rejection(rejection, locale))?;

        validate_with_locale(&value, locale)?;

        Ok(ValidatedJson(value))
    }
}

/// `Query<T>` with an enveloped rejection.
#[derive(Debug, Clone, Copy, Default)]
pub struct QueryParams<T>(pub T);

impl<T, S> FromRequestParts<S> for QueryParams<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Query(value) = Query::<T>::from_request_parts(parts, state)
            .await
            .map_err(|rejection| {
                AppError::bad_request(format!("invalid query parameters: {}", rejection.body_text()))
            })?;
        Ok(QueryParams(value))
    }
}

/// A single numeric `{id}` path segment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PathId(pub i64);

impl<S> FromRequestParts<S> for PathId
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Path(id) = Path::<i64>::from_request_parts(parts, state)
            .await
            .map_err(|_| AppError::bad_request("id must be a positive integer"))?;
        if id < 1 {
            return Err(AppError::bad_request("id must be a positive integer"));
        }
        Ok(PathId(id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use edudesk_core::ErrorCode;
    use serde::Deserialize;

    #[derive(Debug, Deserialize, Validate)]
    struct Probe {
        #[validate(length(min = 2, max = 4))]
        name: String,
        #[validate(email)]
        email: String,
    }

    #[test]
    fn test_errors_are_sorted_and_localized() {
        let probe = Probe {
            name: "a".into(),
            email: "nope".into(),
        };
        let err = validate_with_locale(&probe, Locale::En).unwrap_err();
        assert_eq!(err.code, ErrorCode::BadRequest);
        assert_eq!(
            err.details,
            vec![
                "email must be a valid email address".to_string(),
                "name must be between 2 and 4 characters".to_string(),
            ]
        );

        let err = validate_with_locale(&probe, Locale::Zh).unwrap_err();
        assert_eq!(err.message, "请求参数错误");
        assert_eq!(err.details[0], "email必须是有效的邮箱地址");
    }

    #[test]
    fn test_valid_value_passes() {
        let probe = Probe {
            name: "ann".into(),
            email: "ann@example.com".into(),
        };
        assert!(validate_with_locale(&probe, Locale::En).is_ok());
    }
}
