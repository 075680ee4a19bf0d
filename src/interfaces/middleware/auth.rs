use axum::{
    extract::FromRequestParts,
    http::{request::Parts, StatusCode},
    response::{IntoResponse, Response},
    Json,
};

use crate::common::errors::{ErrorBody, PLUGIN_NAME};
use crate::domain::entities::member::Member;

/// Miembro autenticado. La capa de autenticación del host lo deja en las
/// extensiones de la petición antes de llegar a este router.
#[derive(Clone, Debug)]
pub struct AuthMember(pub Member);

// Error para las operaciones de autenticación
#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    #[error("Member not authenticated")]
    MemberNotProvided,
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        let status = match self {
            AuthError::MemberNotProvided => StatusCode::UNAUTHORIZED,
        };

        let body = ErrorBody {
            name: "Unauthorized".to_string(),
            code: "UNAUTHORIZED".to_string(),
            status_code: status.as_u16(),
            message: self.to_string(),
            origin: PLUGIN_NAME.to_string(),
            data: serde_json::Value::Null,
        };

        (status, Json(body)).into_response()
    }
}

impl<S> FromRequestParts<S> for AuthMember
where
    S: Send + Sync,
{
    type Rejection = AuthError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<Member>()
            .cloned()
            .map(AuthMember)
            .ok_or(AuthError::MemberNotProvided)
    }
}
