use axum::{
    http::StatusCode,
    response::IntoResponse,
    routing::MethodFilter,
    Json,
};
use directory::{RequestError, ValidationErrors};
use schemars::{schema_for, JsonSchema};
use serde::Serialize;

pub type RouteResult<O> = Result<Json<O>, RouteErrorResponse>;

/// A `MethodFilter` that matches all http methods.
pub(crate) const METHOD_FILTER_ALL: MethodFilter = MethodFilter::GET
    .or(MethodFilter::POST)
    .or(MethodFilter::PATCH)
    .or(MethodFilter::PUT)
    .or(MethodFilter::DELETE);

#[derive(Debug, Clone, Serialize)]
#[serde(untagged)]
pub enum ErrorBody {
    /// `{"error": ...}` for not-found and bad-request answers.
    Plain { error: String },
    /// `{"message": ..., "errors": {field: [messages]}}` for validation
    /// answers.
    Validation(ValidationErrors),
}

#[derive(Debug, Clone)]
pub struct RouteErrorResponse {
    pub status_code: StatusCode,
    pub body: ErrorBody,
}

impl RouteErrorResponse {
    pub fn new(status_code: StatusCode, error: impl Into<String>) -> Self {
        Self {
            status_code,
            body: ErrorBody::Plain {
                error: error.into(),
            },
        }
    }

    pub fn not_found(error: impl Into<String>) -> Self {
        Self::new(StatusCode::NOT_FOUND, error)
    }

    pub fn bad_request(error: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, error)
    }

    pub fn validation(errors: ValidationErrors) -> Self {
        Self {
            status_code: StatusCode::UNPROCESSABLE_ENTITY,
            body: ErrorBody::Validation(errors),
        }
    }
}

impl From<RequestError> for RouteErrorResponse {
    fn from(value: RequestError) -> Self {
        match value {
            RequestError::NotFound { entity } => {
                Self::not_found(format!("{} not found", entity))
            }
            RequestError::BadRequest(message) => Self::bad_request(message),
            RequestError::Validation(errors) => Self::validation(errors),
            RequestError::Other(why) => {
                log::error!("request failed: {}", why);
                Self::new(
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal server error",
                )
            }
        }
    }
}

impl IntoResponse for RouteErrorResponse {
    fn into_response(self) -> axum::response::Response {
        (self.status_code, Json(self.body)).into_response()
    }
}

pub(crate) async fn route_not_found() -> impl IntoResponse {
    RouteErrorResponse::not_found("Not found")
}

pub(crate) async fn schema<T: JsonSchema>() -> impl IntoResponse {
    Json(schema_for!(T))
}
