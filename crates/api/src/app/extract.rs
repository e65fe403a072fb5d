use axum::extract::{FromRequest, Request};
use axum::http::StatusCode;
use axum::response::Response;
use axum::Json;
use serde::de::DeserializeOwned;

use crate::app::errors::json_error;

/// JSON body extractor whose rejections use the API error shape.
///
/// A body that is not JSON, has the wrong content type or has a field of the
/// wrong type is a 400 `validation_error`, like any other bad input.
pub struct ApiJson<T>(pub T);

#[axum::async_trait]
impl<T, S> FromRequest<S> for ApiJson<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = Response;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        match Json::<T>::from_request(req, state).await {
            Ok(Json(value)) => Ok(ApiJson(value)),
            Err(rejection) => {
                tracing::debug!(status = %rejection.status(), "request body rejected");
                Err(json_error(
                    StatusCode::BAD_REQUEST,
                    "validation_error",
                    rejection.body_text(),
                ))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use axum::body::Body;
    use axum::http::header::CONTENT_TYPE;

    use super::*;
    use crate::app::dto::LoginRequest;

    async fn extract(req: Request) -> Result<ApiJson<LoginRequest>, Response> {
        ApiJson::<LoginRequest>::from_request(req, &()).await
    }

    #[tokio::test]
    async fn well_formed_body_is_extracted() {
        let req = Request::builder()
            .header(CONTENT_TYPE, "application/json")
            .body(Body::from(r#"{"email":"jane@example.com","password":"password123"}"#))
            .unwrap();

        let ApiJson(body) = extract(req).await.unwrap();
        assert_eq!(body.email, "jane@example.com");
    }

    #[tokio::test]
    async fn wrong_type_and_missing_content_type_are_bad_requests() {
        let wrong_type = Request::builder()
            .header(CONTENT_TYPE, "application/json")
            .body(Body::from(r#"{"email":5}"#))
            .unwrap();
        assert_eq!(extract(wrong_type).await.err().unwrap().status(), StatusCode::BAD_REQUEST);

        let no_content_type = Request::builder().body(Body::from("x")).unwrap();
        assert_eq!(extract(no_content_type).await.err().unwrap().status(), StatusCode::BAD_REQUEST);
    }
}
