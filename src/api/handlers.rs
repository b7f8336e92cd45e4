use crate::application::circulation::{
    self, CirculationError, ServiceDependencies, close_issue as execute_close_issue,
    issue_or_renew as execute_issue_or_renew,
};
use crate::domain::CirculationPolicy;
use crate::domain::commands::IssueBook;
use crate::domain::value_objects::{BookId, IssueId, MemberId};
use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use chrono::{NaiveDate, Utc};
use std::sync::Arc;
use uuid::Uuid;

use super::{
    error::ApiError,
    types::{
        AddMemberRequest, BookFieldsRequest, BookResponse, IssueBookRequest, IssueOutcomeResponse,
        LoanStatementQuery, LoanStatementResponse, MemberResponse, RenameMemberRequest,
    },
};

// ============================================================================
// State
// ============================================================================

/// ハンドラー間で共有されるアプリケーション状態
#[derive(Clone)]
pub struct AppState {
    pub service_deps: ServiceDependencies,
    pub policy: CirculationPolicy,
}

/// 日付指定のないリクエストの基準日
fn today() -> NaiveDate {
    Utc::now().date_naive()
}

// ============================================================================
// 貸出ハンドラー
// ============================================================================

/// POST /issues - 書籍を貸し出す／貸出を更新する
///
/// (会員, 書籍)ペアの状態で分岐する:
/// - 貸出レコードなし → 新規貸出（201）
/// - 期限切れ → 今日からやり直し（要承認の設定なら`approve_renewal`が必要）
/// - 貸出中 → 現在の期限から延長（常に`approve_renewal`が必要）
///
/// 承認が無い場合は何も書き込まず`aborted`を返す。
pub async fn issue_book(
    State(state): State<Arc<AppState>>,
    Json(req): Json<IssueBookRequest>,
) -> Result<(StatusCode, Json<IssueOutcomeResponse>), ApiError> {
    let cmd = IssueBook {
        member_id: MemberId::from_uuid(req.member_id),
        book_id: BookId::from_uuid(req.book_id),
        today: req.date.unwrap_or_else(today),
    };

    let outcome =
        execute_issue_or_renew(&state.service_deps, &state.policy, cmd, |_| {
            req.approve_renewal
        })
        .await?;

    let status = match outcome {
        circulation::IssueOutcome::Issued(_) => StatusCode::CREATED,
        _ => StatusCode::OK,
    };

    Ok((status, Json(IssueOutcomeResponse::from(outcome))))
}

/// DELETE /issues/:id - 貸出レコードを削除（返却扱い）
pub async fn delete_issue(
    State(state): State<Arc<AppState>>,
    Path(issue_id): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
    execute_close_issue(&state.service_deps, IssueId::from_uuid(issue_id)).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// GET /members/:id/loans - 会員の貸出明細を取得
///
/// クエリパラメータ:
/// - date: 延滞料金の基準日（YYYY-MM-DD、省略時は今日）
///
/// 各貸出に基準日時点の延滞料金を添えて返す。延滞していない
/// 貸出には料金フィールド自体が現れない。
pub async fn list_member_loans(
    State(state): State<Arc<AppState>>,
    Path(member_id): Path<Uuid>,
    Query(query): Query<LoanStatementQuery>,
) -> Result<Json<Vec<LoanStatementResponse>>, QueryError> {
    let as_of = match query.date {
        Some(raw) => NaiveDate::parse_from_str(&raw, "%Y-%m-%d")
            .map_err(|_| QueryError::BadRequest(format!("Invalid date: {}", raw)))?,
        None => today(),
    };

    let statements = circulation::member_loans(
        &state.service_deps,
        &state.policy,
        MemberId::from_uuid(member_id),
        as_of,
    )
    .await
    .map_err(QueryError::from)?;

    Ok(Json(
        statements
            .into_iter()
            .map(LoanStatementResponse::from)
            .collect(),
    ))
}

// ============================================================================
// 会員ハンドラー
// ============================================================================

/// POST /members - 会員を登録
pub async fn create_member(
    State(state): State<Arc<AppState>>,
    Json(req): Json<AddMemberRequest>,
) -> Result<(StatusCode, Json<MemberResponse>), ApiError> {
    let record = req.into_record(today());
    let member_id = circulation::register_member(&state.service_deps, record).await?;

    let member = circulation::get_member(&state.service_deps, member_id).await?;
    Ok((StatusCode::CREATED, Json(MemberResponse::from(member))))
}

/// GET /members/:id - 会員をIDで取得
pub async fn get_member_by_id(
    State(state): State<Arc<AppState>>,
    Path(member_id): Path<Uuid>,
) -> Result<Json<MemberResponse>, ApiError> {
    let member =
        circulation::get_member(&state.service_deps, MemberId::from_uuid(member_id)).await?;
    Ok(Json(MemberResponse::from(member)))
}

/// GET /members - 全会員を列挙
pub async fn list_members(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<MemberResponse>>, ApiError> {
    let members = circulation::list_members(&state.service_deps).await?;
    Ok(Json(members.into_iter().map(MemberResponse::from).collect()))
}

/// PUT /members/:id - 会員の表示名を変更
///
/// 登録日は作成後不変のため、このエンドポイントでは変更できない。
pub async fn rename_member(
    State(state): State<Arc<AppState>>,
    Path(member_id): Path<Uuid>,
    Json(req): Json<RenameMemberRequest>,
) -> Result<Json<MemberResponse>, ApiError> {
    let member_id = MemberId::from_uuid(member_id);
    circulation::rename_member(&state.service_deps, member_id, &req.name).await?;

    let member = circulation::get_member(&state.service_deps, member_id).await?;
    Ok(Json(MemberResponse::from(member)))
}

/// DELETE /members/:id - 会員を削除（貸出は連鎖削除）
pub async fn delete_member(
    State(state): State<Arc<AppState>>,
    Path(member_id): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
    circulation::remove_member(&state.service_deps, MemberId::from_uuid(member_id)).await?;
    Ok(StatusCode::NO_CONTENT)
}

// ============================================================================
// 書籍ハンドラー
// ============================================================================

/// POST /books - 書籍を登録
pub async fn create_book(
    State(state): State<Arc<AppState>>,
    Json(req): Json<BookFieldsRequest>,
) -> Result<(StatusCode, Json<BookResponse>), ApiError> {
    let book_id = circulation::add_book(&state.service_deps, req.into_record()).await?;

    let book = circulation::get_book(&state.service_deps, book_id).await?;
    Ok((StatusCode::CREATED, Json(BookResponse::from(book))))
}

/// GET /books/:id - 書籍をIDで取得
pub async fn get_book_by_id(
    State(state): State<Arc<AppState>>,
    Path(book_id): Path<Uuid>,
) -> Result<Json<BookResponse>, ApiError> {
    let book = circulation::get_book(&state.service_deps, BookId::from_uuid(book_id)).await?;
    Ok(Json(BookResponse::from(book)))
}

/// GET /books - 蔵書一覧を列挙
pub async fn list_books(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<BookResponse>>, ApiError> {
    let books = circulation::list_books(&state.service_deps).await?;
    Ok(Json(books.into_iter().map(BookResponse::from).collect()))
}

/// PUT /books/:id - 書籍の情報を更新
pub async fn update_book(
    State(state): State<Arc<AppState>>,
    Path(book_id): Path<Uuid>,
    Json(req): Json<BookFieldsRequest>,
) -> Result<Json<BookResponse>, ApiError> {
    let book_id = BookId::from_uuid(book_id);
    circulation::update_book(&state.service_deps, book_id, req.into_record()).await?;

    let book = circulation::get_book(&state.service_deps, book_id).await?;
    Ok(Json(BookResponse::from(book)))
}

/// DELETE /books/:id - 書籍を削除（貸出は連鎖削除）
pub async fn delete_book(
    State(state): State<Arc<AppState>>,
    Path(book_id): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
    circulation::remove_book(&state.service_deps, BookId::from_uuid(book_id)).await?;
    Ok(StatusCode::NO_CONTENT)
}

// ============================================================================
// Error types
// ============================================================================

/// クエリハンドラー用のエラー型
///
/// 入力の形式エラー（不正な日付など）をアプリケーション層へ
/// 渡す前に400として返すために使う。
#[derive(Debug)]
pub enum QueryError {
    NotFound(String),
    BadRequest(String),
    InternalError(String),
}

impl From<CirculationError> for QueryError {
    fn from(err: CirculationError) -> Self {
        match err {
            CirculationError::MemberNotFound => QueryError::NotFound("Member not found".into()),
            CirculationError::BookNotFound => QueryError::NotFound("Book not found".into()),
            CirculationError::IssueNotFound => QueryError::NotFound("Issue not found".into()),
            CirculationError::StoreFailure(e) => QueryError::InternalError(e.to_string()),
        }
    }
}

impl IntoResponse for QueryError {
    fn into_response(self) -> Response {
        let (status, error_type, message) = match self {
            QueryError::NotFound(msg) => (StatusCode::NOT_FOUND, "not_found", msg),
            QueryError::BadRequest(msg) => (StatusCode::BAD_REQUEST, "bad_request", msg),
            QueryError::InternalError(msg) => {
                // 内部エラーの詳細はログに記録し、クライアントには一般的なメッセージのみを返す
                tracing::error!("Internal error in query handler: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "internal_error",
                    "An unexpected error occurred".to_string(),
                )
            }
        };

        let body = Json(super::types::ErrorResponse::new(error_type, message));
        (status, body).into_response()
    }
}
