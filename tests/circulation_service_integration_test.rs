use chrono::NaiveDate;
use rusty_circulation::adapters::memory::MemoryStore;
use rusty_circulation::application::circulation::{
    CirculationError, IssueOutcome, RenewalPrompt, ServiceDependencies, close_issue,
    issue_or_renew, member_loans, register_member, remove_book, remove_member, rename_member,
};
use rusty_circulation::domain::CirculationPolicy;
use rusty_circulation::domain::commands::IssueBook;
use rusty_circulation::domain::records::{NewIssue, NewMember};
use rusty_circulation::domain::value_objects::{BookId, IssueId, MemberId};
use rusty_circulation::ports::IssueStore;
use std::cell::Cell;
use std::sync::Arc;

// ============================================================================
// セットアップヘルパー
// ============================================================================

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

/// インメモリストアでサービスの依存関係を組み立てる
fn setup() -> (ServiceDependencies, Arc<MemoryStore>) {
    let store = Arc::new(MemoryStore::new());
    let deps = ServiceDependencies {
        member_store: store.clone(),
        book_store: store.clone(),
        issue_store: store.clone(),
    };
    (deps, store)
}

/// 会員と書籍を1件ずつ用意する
fn seed_member_and_book(store: &MemoryStore) -> (MemberId, BookId) {
    let member_id = store.seed_member("Souvic Das", date(2022, 1, 15));
    let book_id = store.seed_book("Sherlock Holmes Vol. 1", "Arthur Conan Doyle", 1887);
    (member_id, book_id)
}

/// 既存の貸出レコードを直接仕込む（テストフィクスチャ用）
async fn seed_loan(
    deps: &ServiceDependencies,
    member_id: MemberId,
    book_id: BookId,
    issued_on: NaiveDate,
    due: NaiveDate,
) -> IssueId {
    deps.issue_store
        .insert(NewIssue {
            member_id,
            book_id,
            issued_on,
            due,
        })
        .await
        .unwrap()
}

fn cmd(member_id: MemberId, book_id: BookId, today: NaiveDate) -> IssueBook {
    IssueBook {
        member_id,
        book_id,
        today,
    }
}

// ============================================================================
// 新規貸出
// ============================================================================

#[tokio::test]
async fn test_issue_creates_loan_with_due_after_loan_period() {
    let (deps, store) = setup();
    let (member_id, book_id) = seed_member_and_book(&store);
    let policy = CirculationPolicy::default();

    // 新規貸出に確認は要らない
    let confirm_calls = Cell::new(0u32);
    let outcome = issue_or_renew(
        &deps,
        &policy,
        cmd(member_id, book_id, date(2022, 10, 1)),
        |_| {
            confirm_calls.set(confirm_calls.get() + 1);
            true
        },
    )
    .await
    .unwrap();

    // 2022-10-01 + 28日 = 2022-10-29
    match outcome {
        IssueOutcome::Issued(receipt) => {
            assert_eq!(receipt.member_id, member_id);
            assert_eq!(receipt.book_id, book_id);
            assert_eq!(receipt.issued_on, date(2022, 10, 1));
            assert_eq!(receipt.due, date(2022, 10, 29));
        }
        other => panic!("Expected Issued, got {:?}", other),
    }
    assert_eq!(confirm_calls.get(), 0);

    // ストアには行がちょうど1件
    let issues = deps.issue_store.list_all().await.unwrap();
    assert_eq!(issues.len(), 1);
    assert_eq!(issues[0].issued_on, date(2022, 10, 1));
    assert_eq!(issues[0].due, date(2022, 10, 29));
}

#[tokio::test]
async fn test_issue_fails_for_unknown_member() {
    let (deps, store) = setup();
    let book_id = store.seed_book("Sherlock Holmes Vol. 1", "Arthur Conan Doyle", 1887);
    let policy = CirculationPolicy::default();

    let result = issue_or_renew(
        &deps,
        &policy,
        cmd(MemberId::new(), book_id, date(2022, 10, 1)),
        |_| true,
    )
    .await;

    assert!(matches!(result, Err(CirculationError::MemberNotFound)));
    assert!(deps.issue_store.list_all().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_issue_fails_for_unknown_book() {
    let (deps, store) = setup();
    let member_id = store.seed_member("Souvic Das", date(2022, 1, 15));
    let policy = CirculationPolicy::default();

    let result = issue_or_renew(
        &deps,
        &policy,
        cmd(member_id, BookId::new(), date(2022, 10, 1)),
        |_| true,
    )
    .await;

    assert!(matches!(result, Err(CirculationError::BookNotFound)));
    assert!(deps.issue_store.list_all().await.unwrap().is_empty());
}

// ============================================================================
// 期限切れ貸出のやり直し
// ============================================================================

#[tokio::test]
async fn test_confirmed_renewal_of_expired_loan_restarts_from_today() {
    let (deps, store) = setup();
    let (member_id, book_id) = seed_member_and_book(&store);
    let policy = CirculationPolicy::default();

    let issue_id = seed_loan(
        &deps,
        member_id,
        book_id,
        date(2022, 10, 1),
        date(2022, 10, 29),
    )
    .await;

    // 2022-11-03時点で5日超過している
    let prompt = Cell::new(None);
    let outcome = issue_or_renew(
        &deps,
        &policy,
        cmd(member_id, book_id, date(2022, 11, 3)),
        |p| {
            prompt.set(Some(p));
            true
        },
    )
    .await
    .unwrap();

    assert_eq!(prompt.get(), Some(RenewalPrompt::Expired { overdue_days: 5 }));

    // 今日から仕切り直し：2022-11-03 + 28 = 2022-12-01（旧期限+28ではない）
    match outcome {
        IssueOutcome::Renewed(receipt) => {
            assert_eq!(receipt.issued_on, date(2022, 11, 3));
            assert_eq!(receipt.due, date(2022, 12, 1));
        }
        other => panic!("Expected Renewed, got {:?}", other),
    }

    // 行は増えず、既存行が書き換わっている
    let issues = deps.issue_store.list_all().await.unwrap();
    assert_eq!(issues.len(), 1);
    assert_eq!(issues[0].issue_id, issue_id);
    assert_eq!(issues[0].issued_on, date(2022, 11, 3));
    assert_eq!(issues[0].due, date(2022, 12, 1));
}

#[tokio::test]
async fn test_declined_renewal_leaves_store_untouched() {
    let (deps, store) = setup();
    let (member_id, book_id) = seed_member_and_book(&store);
    let policy = CirculationPolicy::default();

    seed_loan(
        &deps,
        member_id,
        book_id,
        date(2022, 10, 1),
        date(2022, 10, 29),
    )
    .await;

    let outcome = issue_or_renew(
        &deps,
        &policy,
        cmd(member_id, book_id, date(2022, 11, 3)),
        |_| false,
    )
    .await
    .unwrap();

    assert_eq!(outcome, IssueOutcome::Aborted);

    let issues = deps.issue_store.list_all().await.unwrap();
    assert_eq!(issues.len(), 1);
    assert_eq!(issues[0].issued_on, date(2022, 10, 1));
    assert_eq!(issues[0].due, date(2022, 10, 29));
}

#[tokio::test]
async fn test_silent_renewal_policy_skips_confirmation() {
    let (deps, store) = setup();
    let (member_id, book_id) = seed_member_and_book(&store);
    // 早期の運用：期限切れは確認なしでやり直す
    let policy = CirculationPolicy {
        prompt_on_expired_renewal: false,
        ..CirculationPolicy::default()
    };

    seed_loan(
        &deps,
        member_id,
        book_id,
        date(2022, 10, 1),
        date(2022, 10, 29),
    )
    .await;

    let outcome = issue_or_renew(
        &deps,
        &policy,
        cmd(member_id, book_id, date(2022, 11, 3)),
        |_| panic!("confirm must not be called under the silent policy"),
    )
    .await
    .unwrap();

    match outcome {
        IssueOutcome::Renewed(receipt) => assert_eq!(receipt.due, date(2022, 12, 1)),
        other => panic!("Expected Renewed, got {:?}", other),
    }
}

// ============================================================================
// 貸出中の延長
// ============================================================================

#[tokio::test]
async fn test_confirmed_extension_adds_period_to_current_due() {
    let (deps, store) = setup();
    let (member_id, book_id) = seed_member_and_book(&store);
    let policy = CirculationPolicy::default();

    seed_loan(
        &deps,
        member_id,
        book_id,
        date(2022, 10, 23),
        date(2022, 11, 20),
    )
    .await;

    // 2022-11-10時点で残り10日
    let prompt = Cell::new(None);
    let outcome = issue_or_renew(
        &deps,
        &policy,
        cmd(member_id, book_id, date(2022, 11, 10)),
        |p| {
            prompt.set(Some(p));
            true
        },
    )
    .await
    .unwrap();

    assert_eq!(prompt.get(), Some(RenewalPrompt::Active { remaining_days: 10 }));

    // 現在の期限からの加算：2022-11-20 + 28 = 2022-12-18（今日+28ではない）
    match outcome {
        IssueOutcome::Extended {
            receipt,
            remaining_days,
        } => {
            assert_eq!(remaining_days, 10);
            assert_eq!(receipt.issued_on, date(2022, 10, 23));
            assert_eq!(receipt.due, date(2022, 12, 18));
        }
        other => panic!("Expected Extended, got {:?}", other),
    }

    let issues = deps.issue_store.list_all().await.unwrap();
    assert_eq!(issues.len(), 1);
    assert_eq!(issues[0].due, date(2022, 12, 18));
}

#[tokio::test]
async fn test_extension_on_due_date_is_active_branch() {
    let (deps, store) = setup();
    let (member_id, book_id) = seed_member_and_book(&store);
    let policy = CirculationPolicy::default();

    seed_loan(
        &deps,
        member_id,
        book_id,
        date(2022, 10, 1),
        date(2022, 10, 29),
    )
    .await;

    // 期限当日は期限内なので延長の分岐に入る
    let outcome = issue_or_renew(
        &deps,
        &policy,
        cmd(member_id, book_id, date(2022, 10, 29)),
        |p| {
            assert_eq!(p, RenewalPrompt::Active { remaining_days: 0 });
            true
        },
    )
    .await
    .unwrap();

    match outcome {
        IssueOutcome::Extended { receipt, .. } => {
            assert_eq!(receipt.due, date(2022, 11, 26));
        }
        other => panic!("Expected Extended, got {:?}", other),
    }
}

#[tokio::test]
async fn test_declined_extension_leaves_store_untouched() {
    let (deps, store) = setup();
    let (member_id, book_id) = seed_member_and_book(&store);
    let policy = CirculationPolicy::default();

    seed_loan(
        &deps,
        member_id,
        book_id,
        date(2022, 10, 23),
        date(2022, 11, 20),
    )
    .await;

    let outcome = issue_or_renew(
        &deps,
        &policy,
        cmd(member_id, book_id, date(2022, 11, 10)),
        |_| false,
    )
    .await
    .unwrap();

    assert_eq!(outcome, IssueOutcome::Aborted);

    let issues = deps.issue_store.list_all().await.unwrap();
    assert_eq!(issues.len(), 1);
    assert_eq!(issues[0].due, date(2022, 11, 20));
}

// ============================================================================
// 貸出明細と延滞料金
// ============================================================================

#[tokio::test]
async fn test_member_loans_reports_fine_while_overdue_and_clears_after_renewal() {
    let (deps, store) = setup();
    let (member_id, book_id) = seed_member_and_book(&store);
    let policy = CirculationPolicy::default();

    // 2022-10-01に貸出 → 期限2022-10-29
    issue_or_renew(
        &deps,
        &policy,
        cmd(member_id, book_id, date(2022, 10, 1)),
        |_| true,
    )
    .await
    .unwrap();

    // 2022-11-03時点：5日超過 × 10/日 = 50
    let statements = member_loans(&deps, &policy, member_id, date(2022, 11, 3))
        .await
        .unwrap();
    assert_eq!(statements.len(), 1);
    assert_eq!(statements[0].fine, Some(50));

    // 同日にやり直し → 期限2022-12-01、料金は不在に戻る
    issue_or_renew(
        &deps,
        &policy,
        cmd(member_id, book_id, date(2022, 11, 3)),
        |_| true,
    )
    .await
    .unwrap();

    let statements = member_loans(&deps, &policy, member_id, date(2022, 11, 3))
        .await
        .unwrap();
    assert_eq!(statements.len(), 1);
    assert_eq!(statements[0].issue.due, date(2022, 12, 1));
    assert_eq!(statements[0].fine, None);
}

#[tokio::test]
async fn test_member_loans_no_fine_on_due_date() {
    let (deps, store) = setup();
    let (member_id, book_id) = seed_member_and_book(&store);
    let policy = CirculationPolicy::default();

    seed_loan(
        &deps,
        member_id,
        book_id,
        date(2022, 10, 1),
        date(2022, 10, 29),
    )
    .await;

    // 期限当日は延滞ではない
    let statements = member_loans(&deps, &policy, member_id, date(2022, 10, 29))
        .await
        .unwrap();
    assert_eq!(statements[0].fine, None);
}

#[tokio::test]
async fn test_member_loans_fails_for_unknown_member() {
    let (deps, _store) = setup();
    let policy = CirculationPolicy::default();

    let result = member_loans(&deps, &policy, MemberId::new(), date(2022, 11, 3)).await;

    assert!(matches!(result, Err(CirculationError::MemberNotFound)));
}

// ============================================================================
// 返却・削除と連鎖
// ============================================================================

#[tokio::test]
async fn test_close_issue_removes_loan_and_allows_fresh_issue() {
    let (deps, store) = setup();
    let (member_id, book_id) = seed_member_and_book(&store);
    let policy = CirculationPolicy::default();

    let issue_id = seed_loan(
        &deps,
        member_id,
        book_id,
        date(2022, 10, 1),
        date(2022, 10, 29),
    )
    .await;

    close_issue(&deps, issue_id).await.unwrap();
    assert!(deps.issue_store.list_all().await.unwrap().is_empty());

    // 返却後の同じペアは新規貸出になる
    let outcome = issue_or_renew(
        &deps,
        &policy,
        cmd(member_id, book_id, date(2022, 12, 5)),
        |_| true,
    )
    .await
    .unwrap();

    match outcome {
        IssueOutcome::Issued(receipt) => assert_eq!(receipt.due, date(2023, 1, 2)),
        other => panic!("Expected Issued, got {:?}", other),
    }
}

#[tokio::test]
async fn test_close_unknown_issue_fails() {
    let (deps, _store) = setup();

    let result = close_issue(&deps, IssueId::new()).await;

    assert!(matches!(result, Err(CirculationError::IssueNotFound)));
}

#[tokio::test]
async fn test_remove_member_cascades_to_issues() {
    let (deps, store) = setup();
    let (member_id, book_id) = seed_member_and_book(&store);

    seed_loan(
        &deps,
        member_id,
        book_id,
        date(2022, 10, 1),
        date(2022, 10, 29),
    )
    .await;

    remove_member(&deps, member_id).await.unwrap();

    assert!(deps.issue_store.list_all().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_remove_book_cascades_to_issues() {
    let (deps, store) = setup();
    let (member_id, book_id) = seed_member_and_book(&store);

    seed_loan(
        &deps,
        member_id,
        book_id,
        date(2022, 10, 1),
        date(2022, 10, 29),
    )
    .await;

    remove_book(&deps, book_id).await.unwrap();

    assert!(deps.issue_store.list_all().await.unwrap().is_empty());
}

// ============================================================================
// 会員レコードの管理
// ============================================================================

#[tokio::test]
async fn test_register_and_rename_member() {
    let (deps, _store) = setup();

    let member_id = register_member(
        &deps,
        NewMember {
            name: "Souvic Das".to_string(),
            enrolled_on: date(2022, 1, 15),
        },
    )
    .await
    .unwrap();

    rename_member(&deps, member_id, "Souvic D.").await.unwrap();

    let member = rusty_circulation::application::circulation::get_member(&deps, member_id)
        .await
        .unwrap();
    assert_eq!(member.name, "Souvic D.");
    // 登録日は変わらない
    assert_eq!(member.enrolled_on, date(2022, 1, 15));
}

#[tokio::test]
async fn test_rename_unknown_member_fails() {
    let (deps, _store) = setup();

    let result = rename_member(&deps, MemberId::new(), "Nobody").await;

    assert!(matches!(result, Err(CirculationError::MemberNotFound)));
}
