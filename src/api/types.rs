use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::application::circulation::{IssueOutcome, LoanStatement};
use crate::domain::records::{Book, Member, NewBook, NewMember};

// ============================================================================
// 会員
// ============================================================================

/// 会員登録リクエスト（POST /members）
///
/// `enrolled_on`を省略すると今日の日付で登録される。
#[derive(Debug, Deserialize)]
pub struct AddMemberRequest {
    pub name: String,
    pub enrolled_on: Option<NaiveDate>,
}

impl AddMemberRequest {
    pub fn into_record(self, today: NaiveDate) -> NewMember {
        NewMember {
            name: self.name,
            enrolled_on: self.enrolled_on.unwrap_or(today),
        }
    }
}

/// 会員名変更リクエスト（PUT /members/:id）
///
/// 登録日は作成後不変のため、変更できるのは表示名のみ。
#[derive(Debug, Deserialize)]
pub struct RenameMemberRequest {
    pub name: String,
}

/// 会員レスポンス
#[derive(Debug, Serialize)]
pub struct MemberResponse {
    pub member_id: Uuid,
    pub name: String,
    pub enrolled_on: NaiveDate,
}

impl From<Member> for MemberResponse {
    fn from(member: Member) -> Self {
        Self {
            member_id: member.member_id.value(),
            name: member.name,
            enrolled_on: member.enrolled_on,
        }
    }
}

// ============================================================================
// 書籍
// ============================================================================

/// 書籍の登録・更新リクエスト（POST /books, PUT /books/:id）
#[derive(Debug, Deserialize)]
pub struct BookFieldsRequest {
    pub title: String,
    pub author: String,
    pub published_year: i32,
}

impl BookFieldsRequest {
    pub fn into_record(self) -> NewBook {
        NewBook {
            title: self.title,
            author: self.author,
            published_year: self.published_year,
        }
    }
}

/// 書籍レスポンス
#[derive(Debug, Serialize)]
pub struct BookResponse {
    pub book_id: Uuid,
    pub title: String,
    pub author: String,
    pub published_year: i32,
}

impl From<Book> for BookResponse {
    fn from(book: Book) -> Self {
        Self {
            book_id: book.book_id.value(),
            title: book.title,
            author: book.author,
            published_year: book.published_year,
        }
    }
}

// ============================================================================
// 貸出
// ============================================================================

/// 貸出リクエスト（POST /issues）
///
/// `date`を省略すると今日を基準日として処理する。
/// `approve_renewal`は操作者確認の代わりで、既存貸出の
/// やり直し・延長をこのリクエストで承認するかどうか。
#[derive(Debug, Deserialize)]
pub struct IssueBookRequest {
    pub member_id: Uuid,
    pub book_id: Uuid,
    pub date: Option<NaiveDate>,
    #[serde(default)]
    pub approve_renewal: bool,
}

/// 貸出操作の結果レスポンス
///
/// 成功した各経路は貸出控え（会員・書籍・期限）を運ぶ。
#[derive(Debug, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum IssueOutcomeResponse {
    Issued {
        member_id: Uuid,
        book_id: Uuid,
        issued_on: NaiveDate,
        due: NaiveDate,
    },
    Renewed {
        member_id: Uuid,
        book_id: Uuid,
        issued_on: NaiveDate,
        due: NaiveDate,
    },
    Extended {
        member_id: Uuid,
        book_id: Uuid,
        issued_on: NaiveDate,
        due: NaiveDate,
        remaining_days: i64,
    },
    Aborted,
}

impl From<IssueOutcome> for IssueOutcomeResponse {
    fn from(outcome: IssueOutcome) -> Self {
        match outcome {
            IssueOutcome::Issued(receipt) => Self::Issued {
                member_id: receipt.member_id.value(),
                book_id: receipt.book_id.value(),
                issued_on: receipt.issued_on,
                due: receipt.due,
            },
            IssueOutcome::Renewed(receipt) => Self::Renewed {
                member_id: receipt.member_id.value(),
                book_id: receipt.book_id.value(),
                issued_on: receipt.issued_on,
                due: receipt.due,
            },
            IssueOutcome::Extended {
                receipt,
                remaining_days,
            } => Self::Extended {
                member_id: receipt.member_id.value(),
                book_id: receipt.book_id.value(),
                issued_on: receipt.issued_on,
                due: receipt.due,
                remaining_days,
            },
            IssueOutcome::Aborted => Self::Aborted,
        }
    }
}

/// 貸出明細のクエリパラメータ（GET /members/:id/loans）
#[derive(Debug, Deserialize)]
pub struct LoanStatementQuery {
    /// 延滞料金の基準日（YYYY-MM-DD、省略時は今日）
    pub date: Option<String>,
}

/// 貸出明細レスポンス
///
/// `fine`は基準日時点の延滞料金。延滞していなければフィールドごと
/// 出力されない（ゼロではなく不在）。
#[derive(Debug, Serialize)]
pub struct LoanStatementResponse {
    pub issue_id: Uuid,
    pub member_id: Uuid,
    pub book_id: Uuid,
    pub issued_on: NaiveDate,
    pub due: NaiveDate,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fine: Option<i64>,
}

impl From<LoanStatement> for LoanStatementResponse {
    fn from(statement: LoanStatement) -> Self {
        Self {
            issue_id: statement.issue.issue_id.value(),
            member_id: statement.issue.member_id.value(),
            book_id: statement.issue.book_id.value(),
            issued_on: statement.issue.issued_on,
            due: statement.issue.due,
            fine: statement.fine,
        }
    }
}

// ============================================================================
// エラー
// ============================================================================

/// エラーレスポンス
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    pub message: String,
}

impl ErrorResponse {
    pub fn new(error: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            error: error.into(),
            message: message.into(),
        }
    }
}
