pub mod book_store;
pub mod issue_store;
pub mod member_store;

pub use book_store::*;
pub use issue_store::*;
pub use member_store::*;
