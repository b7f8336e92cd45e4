use crate::domain::records::{Member, NewMember};
use crate::domain::value_objects::MemberId;
use crate::ports::member_store::{MemberStore as MemberStoreTrait, Result};
use async_trait::async_trait;
use sqlx::{PgPool, Row, postgres::PgRow};

/// Map a database row to a Member record
fn map_row_to_member(row: &PgRow) -> Member {
    Member {
        member_id: MemberId::from_uuid(row.get("member_id")),
        name: row.get("name"),
        enrolled_on: row.get("enrolled_on"),
    }
}

/// PostgreSQL implementation of MemberStore
///
/// Members live in a plain relational table. Deleting a member cascades
/// to its issues through the schema's foreign keys, so the adapter only
/// ever touches the members table.
pub struct MemberStore {
    pool: PgPool,
}

impl MemberStore {
    /// Create a new MemberStore with a PostgreSQL connection pool
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl MemberStoreTrait for MemberStore {
    async fn get_by_id(&self, member_id: MemberId) -> Result<Option<Member>> {
        let row = sqlx::query(
            r#"
            SELECT member_id, name, enrolled_on
            FROM members
            WHERE member_id = $1
            "#,
        )
        .bind(member_id.value())
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.as_ref().map(map_row_to_member))
    }

    async fn list_all(&self) -> Result<Vec<Member>> {
        let rows = sqlx::query(
            r#"
            SELECT member_id, name, enrolled_on
            FROM members
            ORDER BY enrolled_on, name
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.iter().map(map_row_to_member).collect())
    }

    /// Insert a member, assigning a fresh identifier
    async fn insert(&self, record: NewMember) -> Result<MemberId> {
        let member_id = MemberId::new();

        sqlx::query(
            r#"
            INSERT INTO members (member_id, name, enrolled_on)
            VALUES ($1, $2, $3)
            "#,
        )
        .bind(member_id.value())
        .bind(&record.name)
        .bind(record.enrolled_on)
        .execute(&self.pool)
        .await?;

        Ok(member_id)
    }

    /// Update the display name only; enrolled_on is immutable
    async fn update_name(&self, member_id: MemberId, name: &str) -> Result<bool> {
        let result = sqlx::query(
            r#"
            UPDATE members
            SET name = $2
            WHERE member_id = $1
            "#,
        )
        .bind(member_id.value())
        .bind(name)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Delete a member; issues cascade via the schema's foreign key
    async fn delete(&self, member_id: MemberId) -> Result<bool> {
        let result = sqlx::query(
            r#"
            DELETE FROM members
            WHERE member_id = $1
            "#,
        )
        .bind(member_id.value())
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }
}
