mod circulation_service;
mod errors;
mod record_admin;

pub use circulation_service::{
    IssueOutcome, LoanStatement, RenewalPrompt, ServiceDependencies, close_issue, issue_or_renew,
    member_loans,
};
pub use errors::{CirculationError, Result};
pub use record_admin::{
    add_book, get_book, get_member, list_books, list_members, register_member, remove_book,
    remove_member, rename_member, update_book,
};
