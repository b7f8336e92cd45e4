use crate::domain::records::{Issue, NewIssue};
use crate::domain::value_objects::{BookId, IssueId, MemberId};
use crate::ports::issue_store::{IssueStore as IssueStoreTrait, Result};
use async_trait::async_trait;
use chrono::NaiveDate;
use sqlx::{PgPool, Row, postgres::PgRow};

/// データベースの行をIssueレコードに変換する
fn map_row_to_issue(row: &PgRow) -> Issue {
    Issue {
        issue_id: IssueId::from_uuid(row.get("issue_id")),
        member_id: MemberId::from_uuid(row.get("member_id")),
        book_id: BookId::from_uuid(row.get("book_id")),
        issued_on: row.get("issued_on"),
        due: row.get("due"),
    }
}

/// IssueStoreのPostgreSQL実装
///
/// (member_id, book_id)のUNIQUE制約により、ペアごとの貸出レコードが
/// 高々1件であることをスキーマが保証する。ライフサイクル管理の
/// 「検索してから書き込む」手順が同時に走っても重複行は作れない。
pub struct IssueStore {
    pool: PgPool,
}

impl IssueStore {
    /// PostgreSQLコネクションプールから新しいIssueStoreを作成
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl IssueStoreTrait for IssueStore {
    async fn get_by_id(&self, issue_id: IssueId) -> Result<Option<Issue>> {
        let row = sqlx::query(
            r#"
            SELECT issue_id, member_id, book_id, issued_on, due
            FROM issues
            WHERE issue_id = $1
            "#,
        )
        .bind(issue_id.value())
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.as_ref().map(map_row_to_issue))
    }

    /// (会員, 書籍)ペアで貸出を検索する
    ///
    /// UNIQUE制約があるため結果は高々1件。
    async fn find_by_member_and_book(
        &self,
        member_id: MemberId,
        book_id: BookId,
    ) -> Result<Option<Issue>> {
        let row = sqlx::query(
            r#"
            SELECT issue_id, member_id, book_id, issued_on, due
            FROM issues
            WHERE member_id = $1 AND book_id = $2
            "#,
        )
        .bind(member_id.value())
        .bind(book_id.value())
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.as_ref().map(map_row_to_issue))
    }

    async fn list_for_member(&self, member_id: MemberId) -> Result<Vec<Issue>> {
        let rows = sqlx::query(
            r#"
            SELECT issue_id, member_id, book_id, issued_on, due
            FROM issues
            WHERE member_id = $1
            ORDER BY issued_on DESC
            "#,
        )
        .bind(member_id.value())
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.iter().map(map_row_to_issue).collect())
    }

    async fn list_all(&self) -> Result<Vec<Issue>> {
        let rows = sqlx::query(
            r#"
            SELECT issue_id, member_id, book_id, issued_on, due
            FROM issues
            ORDER BY issued_on DESC
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.iter().map(map_row_to_issue).collect())
    }

    /// 貸出を挿入し、採番したIDを返す
    ///
    /// 同じペアの行が既にあればUNIQUE制約違反がエラーとして返る。
    async fn insert(&self, record: NewIssue) -> Result<IssueId> {
        let issue_id = IssueId::new();

        sqlx::query(
            r#"
            INSERT INTO issues (issue_id, member_id, book_id, issued_on, due)
            VALUES ($1, $2, $3, $4, $5)
            "#,
        )
        .bind(issue_id.value())
        .bind(record.member_id.value())
        .bind(record.book_id.value())
        .bind(record.issued_on)
        .bind(record.due)
        .execute(&self.pool)
        .await?;

        Ok(issue_id)
    }

    /// 貸出日と期限を1回のUPDATEで書き換える
    async fn update_schedule(
        &self,
        issue_id: IssueId,
        issued_on: NaiveDate,
        due: NaiveDate,
    ) -> Result<bool> {
        let result = sqlx::query(
            r#"
            UPDATE issues
            SET issued_on = $2, due = $3
            WHERE issue_id = $1
            "#,
        )
        .bind(issue_id.value())
        .bind(issued_on)
        .bind(due)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn delete(&self, issue_id: IssueId) -> Result<bool> {
        let result = sqlx::query(
            r#"
            DELETE FROM issues
            WHERE issue_id = $1
            "#,
        )
        .bind(issue_id.value())
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }
}
