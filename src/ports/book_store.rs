use crate::domain::records::{Book, NewBook};
use crate::domain::value_objects::BookId;
use async_trait::async_trait;

pub type Result<T> = std::result::Result<T, Box<dyn std::error::Error + Send + Sync>>;

/// 書籍ストアポート
///
/// 蔵書カタログのCRUDを抽象化する。
#[async_trait]
pub trait BookStore: Send + Sync {
    /// IDで書籍を取得する
    ///
    /// 見つからない場合は`None`。
    async fn get_by_id(&self, book_id: BookId) -> Result<Option<Book>>;

    /// 蔵書一覧を列挙する
    async fn list_all(&self) -> Result<Vec<Book>>;

    /// 書籍を挿入し、採番されたIDを返す
    async fn insert(&self, record: NewBook) -> Result<BookId>;

    /// 書籍の情報を更新する
    ///
    /// 対象が存在しない場合は`false`を返す。
    async fn update(&self, book_id: BookId, fields: NewBook) -> Result<bool>;

    /// 書籍を削除する
    ///
    /// この書籍の貸出レコードも連鎖して削除される。
    /// 対象が存在しない場合は`false`を返す。
    async fn delete(&self, book_id: BookId) -> Result<bool>;
}
