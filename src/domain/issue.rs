use chrono::{Duration, NaiveDate};
use serde::{Deserialize, Serialize};

use super::records::{Issue, NewIssue};
use super::{BookId, MemberId};

/// 貸出ポリシー
///
/// 元の運用では貸出期間28日・延滞料金10/日が定数として散在していた。
/// ここでは設定値として注入する。`prompt_on_expired_renewal`は
/// 期限切れ貸出の再貸出時に操作者の確認を求めるかどうか
/// （求めない場合は黙って貸出をやり直す）。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CirculationPolicy {
    /// 貸出期間（日数）
    pub loan_period_days: i64,
    /// 延滞料金（1日あたり）
    pub fine_per_day: i64,
    /// 期限切れ貸出の再貸出に確認を求めるか
    pub prompt_on_expired_renewal: bool,
}

impl Default for CirculationPolicy {
    fn default() -> Self {
        Self {
            loan_period_days: 28,
            fine_per_day: 10,
            prompt_on_expired_renewal: true,
        }
    }
}

/// 貸出控え - 操作結果として呼び出し側に提示する情報
///
/// どの会員にどの書籍がいつまで貸し出されたかだけを持つ。
/// 表示用であり、永続化はされない。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoanReceipt {
    pub member_id: MemberId,
    pub book_id: BookId,
    pub issued_on: NaiveDate,
    pub due: NaiveDate,
}

impl LoanReceipt {
    /// 既存の貸出レコードから控えを作る
    pub fn from_issue(issue: &Issue) -> Self {
        Self {
            member_id: issue.member_id,
            book_id: issue.book_id,
            issued_on: issue.issued_on,
            due: issue.due,
        }
    }
}

// ============================================================================
// 純粋関数：貸出ライフサイクル
// ============================================================================

/// 純粋関数：新規貸出のレコードを組み立てる
///
/// ビジネスルール：
/// - `issued_on = today`
/// - `due = today + 貸出期間`
///
/// 副作用なし。挿入ペイロードを返し、ID採番はストアに委ねる。
pub fn open_loan(
    member_id: MemberId,
    book_id: BookId,
    today: NaiveDate,
    policy: &CirculationPolicy,
) -> NewIssue {
    NewIssue {
        member_id,
        book_id,
        issued_on: today,
        due: today + Duration::days(policy.loan_period_days),
    }
}

/// 純粋関数：期限切れの貸出をやり直す
///
/// ビジネスルール：
/// - 貸出は今日から仕切り直し：`issued_on = today`、`due = today + 貸出期間`
/// - 延滞していた期間は新しい期限に持ち越さない
///
/// 副作用なし。書き換え後のレコードを返す。
pub fn restart_loan(issue: &Issue, today: NaiveDate, policy: &CirculationPolicy) -> Issue {
    Issue {
        issued_on: today,
        due: today + Duration::days(policy.loan_period_days),
        ..issue.clone()
    }
}

/// 純粋関数：貸出中の貸出を延長する
///
/// ビジネスルール：
/// - 新しい期限は現在の期限からの加算：`due = 現在のdue + 貸出期間`
///   （todayからの加算ではない）
///
/// 副作用なし。書き換え後のレコードを返す。
pub fn extend_loan(issue: &Issue, policy: &CirculationPolicy) -> Issue {
    Issue {
        due: issue.due + Duration::days(policy.loan_period_days),
        ..issue.clone()
    }
}

/// 純粋関数：期限までの残り日数
///
/// 貸出中（`due >= today`）の貸出について、延長確認の際に
/// 操作者へ提示する値。期限当日は0。
pub fn remaining_days(issue: &Issue, today: NaiveDate) -> i64 {
    (issue.due - today).num_days()
}

/// 純粋関数：期限切れ判定
///
/// `today > due`で期限切れ。期限当日（`today == due`）は期限内。
pub fn is_expired(issue: &Issue, today: NaiveDate) -> bool {
    today > issue.due
}
