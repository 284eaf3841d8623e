use axum::{
    async_trait,
    extract::FromRequestParts,
    http::{request::Parts, StatusCode},
    response::Json,
};

use crate::api::ErrorResponse;
use crate::clients::AuthUser;
use crate::reviews::handlers::ReviewState;
use crate::store::traits::CodeReviewStore;

/// Axum extractor for the verified caller identity.
///
/// The bearer token is forwarded to the auth service; any failure (missing
/// header, malformed scheme, unreachable service, rejected token) answers 401.
#[async_trait]
impl<S> FromRequestParts<ReviewState<S>> for AuthUser
where
    S: CodeReviewStore + 'static,
{
    type Rejection = (StatusCode, Json<ErrorResponse>);

    async fn from_request_parts(
        parts: &mut Parts,
        state: &ReviewState<S>,
    ) -> Result<Self, Self::Rejection> {
        let invalid = || {
            (
                StatusCode::UNAUTHORIZED,
                Json(ErrorResponse::new("Invalid token")),
            )
        };

        let header = parts
            .headers
            .get("authorization")
            .and_then(|value| value.to_str().ok())
            .ok_or_else(invalid)?;

        let token = header
            .strip_prefix("Bearer ")
            .or_else(|| header.strip_prefix("bearer "))
            .ok_or_else(invalid)?;

        state.auth.verify(token).await.map_err(|_| invalid())
    }
}
