use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// 会員ID - 会員レコードの識別子
///
/// ストアへの挿入時に採番される。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MemberId(Uuid);

impl MemberId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    pub fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    pub fn value(&self) -> Uuid {
        self.0
    }
}

impl Default for MemberId {
    fn default() -> Self {
        Self::new()
    }
}

/// 書籍ID - 蔵書カタログのレコード識別子
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BookId(Uuid);

impl BookId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    pub fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    pub fn value(&self) -> Uuid {
        self.0
    }
}

impl Default for BookId {
    fn default() -> Self {
        Self::new()
    }
}

/// 貸出ID - 貸出レコードの識別子
///
/// 貸出レコードは(会員, 書籍)ペアごとに高々1件。
/// ライフサイクル操作はペアで検索し、このIDの行を書き換える。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct IssueId(Uuid);

impl IssueId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    pub fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    pub fn value(&self) -> Uuid {
        self.0
    }
}

impl Default for IssueId {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // ID value objects のテスト
    #[test]
    fn test_member_id_creation() {
        let id1 = MemberId::new();
        let id2 = MemberId::new();
        assert_ne!(id1, id2);
    }

    #[test]
    fn test_member_id_from_uuid() {
        let uuid = Uuid::new_v4();
        let id = MemberId::from_uuid(uuid);
        assert_eq!(id.value(), uuid);
    }

    #[test]
    fn test_book_id_creation() {
        let id1 = BookId::new();
        let id2 = BookId::new();
        assert_ne!(id1, id2);
    }

    #[test]
    fn test_issue_id_creation() {
        let id1 = IssueId::new();
        let id2 = IssueId::new();
        assert_ne!(id1, id2);
    }

    #[test]
    fn test_issue_id_from_uuid() {
        let uuid = Uuid::new_v4();
        let id = IssueId::from_uuid(uuid);
        assert_eq!(id.value(), uuid);
    }
}
