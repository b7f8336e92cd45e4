use crate::domain::records::{Book, Issue, Member, NewBook, NewIssue, NewMember};
use crate::domain::value_objects::{BookId, IssueId, MemberId};
use crate::ports::book_store::BookStore;
use crate::ports::issue_store::IssueStore;
use crate::ports::member_store::MemberStore;
use async_trait::async_trait;
use chrono::NaiveDate;
use std::collections::HashMap;
use std::sync::Mutex;

type Result<T> = std::result::Result<T, Box<dyn std::error::Error + Send + Sync>>;

/// In-memory implementation of all three record stores
///
/// Holds members, books and issues in Mutex-guarded maps so a single
/// instance can serve every port. Deleting a member or a book cascades
/// to its issues, the same way the relational schema does.
///
/// Used by tests and anywhere a database is not available.
#[derive(Default)]
pub struct MemoryStore {
    members: Mutex<HashMap<MemberId, Member>>,
    books: Mutex<HashMap<BookId, Book>>,
    issues: Mutex<HashMap<IssueId, Issue>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed a member for testing purposes, returning its id
    pub fn seed_member(&self, name: &str, enrolled_on: NaiveDate) -> MemberId {
        let member_id = MemberId::new();
        self.members.lock().unwrap().insert(
            member_id,
            Member {
                member_id,
                name: name.to_string(),
                enrolled_on,
            },
        );
        member_id
    }

    /// Seed a book for testing purposes, returning its id
    pub fn seed_book(&self, title: &str, author: &str, published_year: i32) -> BookId {
        let book_id = BookId::new();
        self.books.lock().unwrap().insert(
            book_id,
            Book {
                book_id,
                title: title.to_string(),
                author: author.to_string(),
                published_year,
            },
        );
        book_id
    }
}

#[async_trait]
impl MemberStore for MemoryStore {
    async fn get_by_id(&self, member_id: MemberId) -> Result<Option<Member>> {
        Ok(self.members.lock().unwrap().get(&member_id).cloned())
    }

    async fn list_all(&self) -> Result<Vec<Member>> {
        Ok(self.members.lock().unwrap().values().cloned().collect())
    }

    async fn insert(&self, record: NewMember) -> Result<MemberId> {
        let member_id = MemberId::new();
        self.members.lock().unwrap().insert(
            member_id,
            Member {
                member_id,
                name: record.name,
                enrolled_on: record.enrolled_on,
            },
        );
        Ok(member_id)
    }

    async fn update_name(&self, member_id: MemberId, name: &str) -> Result<bool> {
        let mut members = self.members.lock().unwrap();
        match members.get_mut(&member_id) {
            Some(member) => {
                member.name = name.to_string();
                Ok(true)
            }
            None => Ok(false),
        }
    }

    /// Delete a member and cascade to its issues
    async fn delete(&self, member_id: MemberId) -> Result<bool> {
        let removed = self.members.lock().unwrap().remove(&member_id).is_some();
        if removed {
            self.issues
                .lock()
                .unwrap()
                .retain(|_, issue| issue.member_id != member_id);
        }
        Ok(removed)
    }
}

#[async_trait]
impl BookStore for MemoryStore {
    async fn get_by_id(&self, book_id: BookId) -> Result<Option<Book>> {
        Ok(self.books.lock().unwrap().get(&book_id).cloned())
    }

    async fn list_all(&self) -> Result<Vec<Book>> {
        Ok(self.books.lock().unwrap().values().cloned().collect())
    }

    async fn insert(&self, record: NewBook) -> Result<BookId> {
        let book_id = BookId::new();
        self.books.lock().unwrap().insert(
            book_id,
            Book {
                book_id,
                title: record.title,
                author: record.author,
                published_year: record.published_year,
            },
        );
        Ok(book_id)
    }

    async fn update(&self, book_id: BookId, fields: NewBook) -> Result<bool> {
        let mut books = self.books.lock().unwrap();
        match books.get_mut(&book_id) {
            Some(book) => {
                book.title = fields.title;
                book.author = fields.author;
                book.published_year = fields.published_year;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    /// Delete a book and cascade to its issues
    async fn delete(&self, book_id: BookId) -> Result<bool> {
        let removed = self.books.lock().unwrap().remove(&book_id).is_some();
        if removed {
            self.issues
                .lock()
                .unwrap()
                .retain(|_, issue| issue.book_id != book_id);
        }
        Ok(removed)
    }
}

#[async_trait]
impl IssueStore for MemoryStore {
    async fn get_by_id(&self, issue_id: IssueId) -> Result<Option<Issue>> {
        Ok(self.issues.lock().unwrap().get(&issue_id).cloned())
    }

    async fn find_by_member_and_book(
        &self,
        member_id: MemberId,
        book_id: BookId,
    ) -> Result<Option<Issue>> {
        Ok(self
            .issues
            .lock()
            .unwrap()
            .values()
            .find(|issue| issue.member_id == member_id && issue.book_id == book_id)
            .cloned())
    }

    async fn list_for_member(&self, member_id: MemberId) -> Result<Vec<Issue>> {
        Ok(self
            .issues
            .lock()
            .unwrap()
            .values()
            .filter(|issue| issue.member_id == member_id)
            .cloned()
            .collect())
    }

    async fn list_all(&self) -> Result<Vec<Issue>> {
        Ok(self.issues.lock().unwrap().values().cloned().collect())
    }

    /// Insert a new issue row
    ///
    /// Rejects a second row for the same (member, book) pair, mirroring
    /// the unique constraint of the relational schema.
    async fn insert(&self, record: NewIssue) -> Result<IssueId> {
        let mut issues = self.issues.lock().unwrap();
        let duplicate = issues
            .values()
            .any(|issue| issue.member_id == record.member_id && issue.book_id == record.book_id);
        if duplicate {
            return Err("issue already exists for this (member, book) pair".into());
        }

        let issue_id = IssueId::new();
        issues.insert(
            issue_id,
            Issue {
                issue_id,
                member_id: record.member_id,
                book_id: record.book_id,
                issued_on: record.issued_on,
                due: record.due,
            },
        );
        Ok(issue_id)
    }

    async fn update_schedule(
        &self,
        issue_id: IssueId,
        issued_on: NaiveDate,
        due: NaiveDate,
    ) -> Result<bool> {
        let mut issues = self.issues.lock().unwrap();
        match issues.get_mut(&issue_id) {
            Some(issue) => {
                issue.issued_on = issued_on;
                issue.due = due;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn delete(&self, issue_id: IssueId) -> Result<bool> {
        Ok(self.issues.lock().unwrap().remove(&issue_id).is_some())
    }
}
