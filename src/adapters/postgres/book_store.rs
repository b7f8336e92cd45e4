use crate::domain::records::{Book, NewBook};
use crate::domain::value_objects::BookId;
use crate::ports::book_store::{BookStore as BookStoreTrait, Result};
use async_trait::async_trait;
use sqlx::{PgPool, Row, postgres::PgRow};

/// データベースの行をBookレコードに変換する
fn map_row_to_book(row: &PgRow) -> Book {
    Book {
        book_id: BookId::from_uuid(row.get("book_id")),
        title: row.get("title"),
        author: row.get("author"),
        published_year: row.get("published_year"),
    }
}

/// BookStoreのPostgreSQL実装
///
/// 蔵書カタログを単一テーブルで保持する。書籍の削除は
/// スキーマの外部キーにより貸出レコードへ連鎖する。
pub struct BookStore {
    pool: PgPool,
}

impl BookStore {
    /// PostgreSQLコネクションプールから新しいBookStoreを作成
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl BookStoreTrait for BookStore {
    async fn get_by_id(&self, book_id: BookId) -> Result<Option<Book>> {
        let row = sqlx::query(
            r#"
            SELECT book_id, title, author, published_year
            FROM books
            WHERE book_id = $1
            "#,
        )
        .bind(book_id.value())
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.as_ref().map(map_row_to_book))
    }

    async fn list_all(&self) -> Result<Vec<Book>> {
        let rows = sqlx::query(
            r#"
            SELECT book_id, title, author, published_year
            FROM books
            ORDER BY title
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.iter().map(map_row_to_book).collect())
    }

    /// 書籍を挿入し、採番したIDを返す
    async fn insert(&self, record: NewBook) -> Result<BookId> {
        let book_id = BookId::new();

        sqlx::query(
            r#"
            INSERT INTO books (book_id, title, author, published_year)
            VALUES ($1, $2, $3, $4)
            "#,
        )
        .bind(book_id.value())
        .bind(&record.title)
        .bind(&record.author)
        .bind(record.published_year)
        .execute(&self.pool)
        .await?;

        Ok(book_id)
    }

    async fn update(&self, book_id: BookId, fields: NewBook) -> Result<bool> {
        let result = sqlx::query(
            r#"
            UPDATE books
            SET title = $2, author = $3, published_year = $4
            WHERE book_id = $1
            "#,
        )
        .bind(book_id.value())
        .bind(&fields.title)
        .bind(&fields.author)
        .bind(fields.published_year)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }

    /// 書籍を削除する。貸出レコードは外部キーで連鎖削除される
    async fn delete(&self, book_id: BookId) -> Result<bool> {
        let result = sqlx::query(
            r#"
            DELETE FROM books
            WHERE book_id = $1
            "#,
        )
        .bind(book_id.value())
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }
}
