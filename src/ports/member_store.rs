use crate::domain::records::{Member, NewMember};
use crate::domain::value_objects::MemberId;
use async_trait::async_trait;

pub type Result<T> = std::result::Result<T, Box<dyn std::error::Error + Send + Sync>>;

/// 会員ストアポート
///
/// 会員レコードのCRUDを抽象化する。ライフサイクル管理は
/// 存在確認（`get_by_id`）にのみ依存する。
#[async_trait]
pub trait MemberStore: Send + Sync {
    /// IDで会員を取得する
    ///
    /// 見つからない場合は`None`。
    async fn get_by_id(&self, member_id: MemberId) -> Result<Option<Member>>;

    /// 全会員を列挙する
    async fn list_all(&self) -> Result<Vec<Member>>;

    /// 会員を挿入し、採番されたIDを返す
    ///
    /// `enrolled_on`は初回登録日としてそのまま保存され、以後不変。
    async fn insert(&self, record: NewMember) -> Result<MemberId>;

    /// 会員の表示名を更新する
    ///
    /// 登録日は作成後不変のため対象外。
    /// 対象が存在しない場合は`false`を返す。
    async fn update_name(&self, member_id: MemberId, name: &str) -> Result<bool>;

    /// 会員を削除する
    ///
    /// この会員の貸出レコードも連鎖して削除される。
    /// 対象が存在しない場合は`false`を返す。
    async fn delete(&self, member_id: MemberId) -> Result<bool>;
}
