use axum::{
    Router,
    routing::{get, post},
};
use std::sync::Arc;
use tower_http::trace::TraceLayer;

use super::handlers::{
    AppState, create_book, create_member, delete_book, delete_issue, delete_member,
    get_book_by_id, get_member_by_id, issue_book, list_books, list_member_loans, list_members,
    rename_member, update_book,
};

/// Creates the API router with all circulation endpoints
///
/// Lifecycle endpoints:
/// - POST /issues - Issue a book, or renew/extend the existing loan
/// - DELETE /issues/:id - Drop a loan record (book returned)
/// - GET /members/:id/loans - Loan statements with derived fines
///
/// Record endpoints:
/// - POST/GET /members, GET/PUT/DELETE /members/:id
/// - POST/GET /books, GET/PUT/DELETE /books/:id
pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        // Health check endpoint
        .route("/health", get(health_check))
        // Loan lifecycle
        .route("/issues", post(issue_book))
        .route("/issues/:id", axum::routing::delete(delete_issue))
        .route("/members/:id/loans", get(list_member_loans))
        // Member records
        .route("/members", post(create_member).get(list_members))
        .route(
            "/members/:id",
            get(get_member_by_id).put(rename_member).delete(delete_member),
        )
        // Book records
        .route("/books", post(create_book).get(list_books))
        .route(
            "/books/:id",
            get(get_book_by_id).put(update_book).delete(delete_book),
        )
        // Add tracing middleware
        .layer(TraceLayer::new_for_http())
        // Add application state
        .with_state(state)
}

/// Health check endpoint
async fn health_check() -> &'static str {
    "OK"
}
