use axum::{
    extract::{FromRequestParts, Request},
    http::request::Parts,
    middleware::Next,
    response::Response,
};

use crate::i18n::Locale;

/// Resolves the request locale once and stores it in the extensions.
pub async fn select_locale(mut req: Request, next: Next) -> Response {
    let locale = Locale::from_headers(req.headers());
    req.extensions_mut().insert(locale);
    next.run(req).await
}

impl<S> FromRequestParts<S> for Locale
where
    S: Send + Sync,
{
    type Rejection = std::convert::Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Ok(parts
            .extensions
            .get::<Locale>()
            .copied()
            .unwrap_or_else(|| Locale::from_headers(&parts.headers)))
    }
}
