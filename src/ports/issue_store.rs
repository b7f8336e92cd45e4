use crate::domain::records::{Issue, NewIssue};
use crate::domain::value_objects::{BookId, IssueId, MemberId};
use async_trait::async_trait;
use chrono::NaiveDate;

pub type Result<T> = std::result::Result<T, Box<dyn std::error::Error + Send + Sync>>;

/// 貸出ストアポート
///
/// 貸出レコードの保管を抽象化する。ライフサイクル管理は
/// (会員, 書籍)ペアでの検索・挿入・日付更新だけに依存する。
/// ペアごとのレコードは高々1件であることをストアが保証する。
#[async_trait]
pub trait IssueStore: Send + Sync {
    /// IDで貸出を取得する
    ///
    /// 見つからない場合は`None`。
    async fn get_by_id(&self, issue_id: IssueId) -> Result<Option<Issue>>;

    /// (会員, 書籍)ペアで貸出を検索する
    ///
    /// ライフサイクル管理が「このペアの」貸出レコードを
    /// 見つけるために使う。高々1件。
    async fn find_by_member_and_book(
        &self,
        member_id: MemberId,
        book_id: BookId,
    ) -> Result<Option<Issue>>;

    /// 会員の貸出を列挙する
    ///
    /// 貸出中一覧と延滞料金の表示に使われる。
    async fn list_for_member(&self, member_id: MemberId) -> Result<Vec<Issue>>;

    /// 全貸出を列挙する
    async fn list_all(&self) -> Result<Vec<Issue>>;

    /// 貸出を挿入し、採番されたIDを返す
    async fn insert(&self, record: NewIssue) -> Result<IssueId>;

    /// 貸出日と期限を書き換える
    ///
    /// 再貸出・延長がこの1回の書き込みで完結する。
    /// 対象が存在しない場合は`false`を返す。
    async fn update_schedule(
        &self,
        issue_id: IssueId,
        issued_on: NaiveDate,
        due: NaiveDate,
    ) -> Result<bool>;

    /// 貸出を削除する（返却扱い）
    ///
    /// 対象が存在しない場合は`false`を返す。
    async fn delete(&self, issue_id: IssueId) -> Result<bool>;
}
