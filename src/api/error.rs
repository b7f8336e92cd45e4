use crate::application::circulation::CirculationError;
use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};

use super::types::ErrorResponse;

/// API層のエラー型
///
/// アプリケーション層のエラーをラップし、HTTPレスポンスへの
/// マッピングを提供する。
#[derive(Debug)]
pub struct ApiError(CirculationError);

impl From<CirculationError> for ApiError {
    fn from(err: CirculationError) -> Self {
        ApiError(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, error_type, message) = match self.0 {
            // 404 Not Found - 参照先のレコードが存在しない
            CirculationError::MemberNotFound => {
                (StatusCode::NOT_FOUND, "MEMBER_NOT_FOUND", "Member not found")
            }
            CirculationError::BookNotFound => {
                (StatusCode::NOT_FOUND, "BOOK_NOT_FOUND", "Book not found")
            }
            CirculationError::IssueNotFound => {
                (StatusCode::NOT_FOUND, "ISSUE_NOT_FOUND", "Issue not found")
            }

            // 500 Internal Server Error - ストア障害
            // 詳細はログに記録し、クライアントには一般的なメッセージのみを返す
            CirculationError::StoreFailure(ref e) => {
                tracing::error!("Store failure: {}", e);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "STORE_FAILURE",
                    "Record store operation failed",
                )
            }
        };

        let body = Json(ErrorResponse::new(error_type, message));
        (status, body).into_response()
    }
}
