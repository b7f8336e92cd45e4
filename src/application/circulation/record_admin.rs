use crate::domain::records::{Book, Member, NewBook, NewMember};
use crate::domain::value_objects::{BookId, MemberId};

use super::circulation_service::ServiceDependencies;
use super::errors::{CirculationError, Result};

// ============================================================================
// 会員の管理操作
// ============================================================================

/// 会員を登録し、採番されたIDを返す
pub async fn register_member(deps: &ServiceDependencies, record: NewMember) -> Result<MemberId> {
    deps.member_store
        .insert(record)
        .await
        .map_err(CirculationError::StoreFailure)
}

/// IDで会員を取得する
pub async fn get_member(deps: &ServiceDependencies, member_id: MemberId) -> Result<Member> {
    deps.member_store
        .get_by_id(member_id)
        .await
        .map_err(CirculationError::StoreFailure)?
        .ok_or(CirculationError::MemberNotFound)
}

/// 全会員を列挙する
pub async fn list_members(deps: &ServiceDependencies) -> Result<Vec<Member>> {
    deps.member_store.list_all().await.map_err(CirculationError::StoreFailure)
}

/// 会員の表示名を変更する
///
/// 登録日は作成後不変のため変更対象にならない。
pub async fn rename_member(
    deps: &ServiceDependencies,
    member_id: MemberId,
    name: &str,
) -> Result<()> {
    let updated = deps
        .member_store
        .update_name(member_id, name)
        .await
        .map_err(CirculationError::StoreFailure)?;

    if !updated {
        return Err(CirculationError::MemberNotFound);
    }
    Ok(())
}

/// 会員を削除する
///
/// 会員の貸出レコードはストアが連鎖して削除する。
pub async fn remove_member(deps: &ServiceDependencies, member_id: MemberId) -> Result<()> {
    let deleted = deps
        .member_store
        .delete(member_id)
        .await
        .map_err(CirculationError::StoreFailure)?;

    if !deleted {
        return Err(CirculationError::MemberNotFound);
    }

    tracing::info!(member_id = %member_id.value(), "removed member");
    Ok(())
}

// ============================================================================
// 書籍の管理操作
// ============================================================================

/// 書籍を登録し、採番されたIDを返す
pub async fn add_book(deps: &ServiceDependencies, record: NewBook) -> Result<BookId> {
    deps.book_store.insert(record).await.map_err(CirculationError::StoreFailure)
}

/// IDで書籍を取得する
pub async fn get_book(deps: &ServiceDependencies, book_id: BookId) -> Result<Book> {
    deps.book_store
        .get_by_id(book_id)
        .await
        .map_err(CirculationError::StoreFailure)?
        .ok_or(CirculationError::BookNotFound)
}

/// 蔵書一覧を列挙する
pub async fn list_books(deps: &ServiceDependencies) -> Result<Vec<Book>> {
    deps.book_store.list_all().await.map_err(CirculationError::StoreFailure)
}

/// 書籍の情報を更新する
pub async fn update_book(
    deps: &ServiceDependencies,
    book_id: BookId,
    fields: NewBook,
) -> Result<()> {
    let updated = deps
        .book_store
        .update(book_id, fields)
        .await
        .map_err(CirculationError::StoreFailure)?;

    if !updated {
        return Err(CirculationError::BookNotFound);
    }
    Ok(())
}

/// 書籍を削除する
///
/// 書籍の貸出レコードはストアが連鎖して削除する。
pub async fn remove_book(deps: &ServiceDependencies, book_id: BookId) -> Result<()> {
    let deleted = deps
        .book_store
        .delete(book_id)
        .await
        .map_err(CirculationError::StoreFailure)?;

    if !deleted {
        return Err(CirculationError::BookNotFound);
    }

    tracing::info!(book_id = %book_id.value(), "removed book");
    Ok(())
}
