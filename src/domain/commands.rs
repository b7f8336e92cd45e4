use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::{BookId, MemberId};

/// コマンド：書籍を貸し出す（または既存貸出を更新する）
///
/// 既に(会員, 書籍)ペアの貸出レコードがある場合、期限切れなら
/// 再貸出、貸出中なら延長の対象になる。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct IssueBook {
    pub member_id: MemberId,
    pub book_id: BookId,
    pub today: NaiveDate,
}
