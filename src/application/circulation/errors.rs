use thiserror::Error;

/// 貸出管理アプリケーション層のエラー
///
/// ストアの「見つからない」はここで明示的なエラーになり、
/// ストア自体の失敗は`StoreFailure`が元のエラーを保持して運ぶ。
/// どの場合もストアへの書き込みは行われないか、1回の書き込みが
/// 完了しているかのどちらかで、中途半端な状態は残らない。
#[derive(Debug, Error)]
pub enum CirculationError {
    /// 会員が存在しない
    #[error("Member not found")]
    MemberNotFound,

    /// 書籍が存在しない
    #[error("Book not found")]
    BookNotFound,

    /// 貸出レコードが存在しない
    #[error("Issue not found")]
    IssueNotFound,

    /// ストアの読み書きが失敗した
    #[error("Store failure")]
    StoreFailure(#[source] Box<dyn std::error::Error + Send + Sync>),
}

/// アプリケーション層の Result型
pub type Result<T> = std::result::Result<T, CirculationError>;
