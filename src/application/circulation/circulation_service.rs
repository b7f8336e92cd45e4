use crate::domain::{self, CirculationPolicy, LoanReceipt, commands::IssueBook, records::Issue};
use crate::domain::value_objects::{IssueId, MemberId};
use crate::ports::{BookStore, IssueStore, MemberStore};
use chrono::NaiveDate;
use std::sync::Arc;

use super::errors::{CirculationError, Result};

/// サービスの依存関係
///
/// 3種類のレコードストアをポート越しに束ねる。
/// 振る舞いは持たず、各操作関数に参照で渡される。
#[derive(Clone)]
pub struct ServiceDependencies {
    pub member_store: Arc<dyn MemberStore>,
    pub book_store: Arc<dyn BookStore>,
    pub issue_store: Arc<dyn IssueStore>,
}

/// 操作者への確認内容
///
/// `issue_or_renew`が書き込みの前に呼び出し側へ提示する。
/// どちらの場合も日数は提示用の情報で、判断は呼び出し側に委ねる。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RenewalPrompt {
    /// 期限切れの貸出をやり直すか（何日超過しているか）
    Expired { overdue_days: i64 },
    /// 貸出中の貸出を延長するか（期限まで何日残っているか）
    Active { remaining_days: i64 },
}

/// `issue_or_renew`の結果
///
/// 成功した各経路は貸出控えを運ぶ。確認が断られた場合は
/// `Aborted`で、ストアには何も書き込まれていない。
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IssueOutcome {
    /// 新規に貸し出した
    Issued(LoanReceipt),
    /// 期限切れの貸出を今日からやり直した
    Renewed(LoanReceipt),
    /// 貸出中の貸出を現在の期限から延長した
    Extended {
        receipt: LoanReceipt,
        /// 確認時に提示した残り日数
        remaining_days: i64,
    },
    /// 操作者が確認を断ったため何もしなかった
    Aborted,
}

/// 会員の貸出明細 - 貸出レコードと派生の延滞料金
///
/// 料金は保存値ではなく照会日時点の計算値。延滞していなければ
/// フィールドごと不在になる（ゼロではない）。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoanStatement {
    pub issue: Issue,
    pub fine: Option<i64>,
}

/// 書籍を貸し出す／貸出を更新する
///
/// (会員, 書籍)ペアの既存レコードの有無と期限で分岐する：
/// - レコードなし → 新規貸出。確認不要。
/// - 期限切れ → 今日から仕切り直し。ポリシーが求める場合のみ確認。
/// - 貸出中 → 現在の期限からの延長。残り日数を提示して必ず確認。
///
/// 確認はストアへの書き込みが発生する前に行われ、断られた経路は
/// 一切書き込まない。成功経路の書き込みは高々1回。
///
/// # 引数
/// * `deps` - サービスの依存関係
/// * `policy` - 貸出期間・確認要否のポリシー
/// * `cmd` - 貸出コマンド（会員ID・書籍ID・基準日）
/// * `confirm` - 操作者確認コールバック。確認が要る分岐でのみ呼ばれる
///
/// # エラー
/// - `MemberNotFound` / `BookNotFound`: 参照先が存在しない
/// - `StoreFailure`: ストアの読み書きが失敗した
pub async fn issue_or_renew<F>(
    deps: &ServiceDependencies,
    policy: &CirculationPolicy,
    cmd: IssueBook,
    confirm: F,
) -> Result<IssueOutcome>
where
    F: Fn(RenewalPrompt) -> bool,
{
    // 1. 参照先の存在確認
    deps.member_store
        .get_by_id(cmd.member_id)
        .await
        .map_err(CirculationError::StoreFailure)?
        .ok_or(CirculationError::MemberNotFound)?;

    deps.book_store
        .get_by_id(cmd.book_id)
        .await
        .map_err(CirculationError::StoreFailure)?
        .ok_or(CirculationError::BookNotFound)?;

    // 2. ペアの既存貸出レコードを検索（高々1件）
    let existing = deps
        .issue_store
        .find_by_member_and_book(cmd.member_id, cmd.book_id)
        .await
        .map_err(CirculationError::StoreFailure)?;

    let Some(issue) = existing else {
        // 3. レコードなし：新規貸出
        let new_issue = domain::open_loan(cmd.member_id, cmd.book_id, cmd.today, policy);
        let receipt = LoanReceipt {
            member_id: new_issue.member_id,
            book_id: new_issue.book_id,
            issued_on: new_issue.issued_on,
            due: new_issue.due,
        };

        deps.issue_store
            .insert(new_issue)
            .await
            .map_err(CirculationError::StoreFailure)?;

        tracing::info!(
            member_id = %cmd.member_id.value(),
            book_id = %cmd.book_id.value(),
            due = %receipt.due,
            "issued book"
        );
        return Ok(IssueOutcome::Issued(receipt));
    };

    if domain::is_expired(&issue, cmd.today) {
        // 4. 期限切れ：今日から仕切り直し
        let overdue_days = (cmd.today - issue.due).num_days();
        if policy.prompt_on_expired_renewal && !confirm(RenewalPrompt::Expired { overdue_days }) {
            return Ok(IssueOutcome::Aborted);
        }

        let renewed = domain::restart_loan(&issue, cmd.today, policy);
        write_schedule(deps, &renewed).await?;

        tracing::info!(
            member_id = %cmd.member_id.value(),
            book_id = %cmd.book_id.value(),
            due = %renewed.due,
            "renewed expired loan"
        );
        Ok(IssueOutcome::Renewed(LoanReceipt::from_issue(&renewed)))
    } else {
        // 5. 貸出中：残り日数を提示し、現在の期限から延長
        let remaining_days = domain::remaining_days(&issue, cmd.today);
        if !confirm(RenewalPrompt::Active { remaining_days }) {
            return Ok(IssueOutcome::Aborted);
        }

        let extended = domain::extend_loan(&issue, policy);
        write_schedule(deps, &extended).await?;

        tracing::info!(
            member_id = %cmd.member_id.value(),
            book_id = %cmd.book_id.value(),
            due = %extended.due,
            "extended active loan"
        );
        Ok(IssueOutcome::Extended {
            receipt: LoanReceipt::from_issue(&extended),
            remaining_days,
        })
    }
}

/// 書き換え後の貸出スケジュールをストアへ反映する
///
/// 対象行が消えていた場合は`IssueNotFound`。
async fn write_schedule(deps: &ServiceDependencies, issue: &Issue) -> Result<()> {
    let updated = deps
        .issue_store
        .update_schedule(issue.issue_id, issue.issued_on, issue.due)
        .await
        .map_err(CirculationError::StoreFailure)?;

    if !updated {
        return Err(CirculationError::IssueNotFound);
    }
    Ok(())
}

/// 会員の貸出明細を取得する
///
/// 各貸出について照会日時点の延滞料金を計算して添える。
/// 延滞していない貸出の料金は不在（None）であり、期限が
/// 先送りされた貸出の料金はここで自然に消える。
///
/// # エラー
/// - `MemberNotFound`: 会員が存在しない
/// - `StoreFailure`: ストアの読み込みが失敗した
pub async fn member_loans(
    deps: &ServiceDependencies,
    policy: &CirculationPolicy,
    member_id: MemberId,
    today: NaiveDate,
) -> Result<Vec<LoanStatement>> {
    deps.member_store
        .get_by_id(member_id)
        .await
        .map_err(CirculationError::StoreFailure)?
        .ok_or(CirculationError::MemberNotFound)?;

    let issues = deps
        .issue_store
        .list_for_member(member_id)
        .await
        .map_err(CirculationError::StoreFailure)?;

    Ok(issues
        .into_iter()
        .map(|issue| {
            let fine = domain::compute_fine(issue.due, today, policy.fine_per_day);
            LoanStatement { issue, fine }
        })
        .collect())
}

/// 貸出レコードを明示的に削除する（返却扱い）
///
/// # エラー
/// - `IssueNotFound`: 貸出が存在しない
/// - `StoreFailure`: ストアの書き込みが失敗した
pub async fn close_issue(deps: &ServiceDependencies, issue_id: IssueId) -> Result<()> {
    let deleted = deps
        .issue_store
        .delete(issue_id)
        .await
        .map_err(CirculationError::StoreFailure)?;

    if !deleted {
        return Err(CirculationError::IssueNotFound);
    }

    tracing::info!(issue_id = %issue_id.value(), "closed issue");
    Ok(())
}
