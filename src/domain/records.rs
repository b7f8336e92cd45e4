use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::{BookId, IssueId, MemberId};

/// 会員レコード
///
/// `enrolled_on`は初回登録日であり、作成後は変更されない。
/// 更新操作で書き換えられるのは表示名のみ。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Member {
    pub member_id: MemberId,
    pub name: String,
    pub enrolled_on: NaiveDate,
}

/// 会員の挿入ペイロード（IDはストアが採番する）
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewMember {
    pub name: String,
    pub enrolled_on: NaiveDate,
}

/// 書籍レコード
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Book {
    pub book_id: BookId,
    pub title: String,
    pub author: String,
    pub published_year: i32,
}

/// 書籍の挿入ペイロード（IDはストアが採番する）
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewBook {
    pub title: String,
    pub author: String,
    pub published_year: i32,
}

/// 貸出レコード - ある書籍がある会員に貸し出されている事実
///
/// 不変条件：作成時・更新時ともに `due = issued_on + 貸出期間`。
/// 延滞料金はここには保存されない。派生値として都度計算される。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Issue {
    pub issue_id: IssueId,

    // 他レコードへの参照（IDのみ）
    pub member_id: MemberId,
    pub book_id: BookId,

    pub issued_on: NaiveDate,
    pub due: NaiveDate,
}

/// 貸出の挿入ペイロード（IDはストアが採番する）
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewIssue {
    pub member_id: MemberId,
    pub book_id: BookId,
    pub issued_on: NaiveDate,
    pub due: NaiveDate,
}
