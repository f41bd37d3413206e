use rusqlite::{Connection, OptionalExtension};

use crate::db::{with_conn, DbPool};
use crate::error::{classify_write_error, AppError, Rejection, Result};
use crate::models::{CreateMember, FromSqliteRow, Member, UpdateMember};

use super::{optional, required};

#[derive(Clone)]
pub struct MemberRepository {
    pool: DbPool,
}

impl MemberRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    pub async fn count(&self) -> Result<i64> {
        with_conn(&self.pool, |conn| {
            let count: i64 = conn.query_row("SELECT COUNT(*) FROM member", [], |row| row.get(0))?;
            Ok(count)
        })
        .await
    }

    pub async fn find_by_id(&self, id: i64) -> Result<Option<Member>> {
        with_conn(&self.pool, move |conn| Ok(load_member(conn, id)?)).await
    }

    pub async fn create(&self, input: CreateMember) -> Result<Member> {
        let full_name = required("Full name", &input.full_name)?;
        let email = required("Email", &input.email)?;
        let phone = optional(input.phone.as_deref());
        let gender = optional(input.gender.as_deref());
        let date_of_birth = input.date_of_birth;

        with_conn(&self.pool, move |conn| {
            let taken: bool = conn.query_row(
                "SELECT EXISTS (SELECT 1 FROM member WHERE email = ?)",
                [&email],
                |row| row.get(0),
            )?;
            if taken {
                return Err(Rejection::DuplicateEmail.into());
            }

            conn.execute(
                "INSERT INTO member (full_name, email, phone, date_of_birth, gender)
                 VALUES (?, ?, ?, ?, ?)",
                rusqlite::params![full_name, email, phone, date_of_birth, gender],
            )
            .map_err(classify_write_error)?;

            let member = Member {
                id: conn.last_insert_rowid(),
                full_name,
                email,
                phone,
                date_of_birth,
                gender,
            };
            tracing::info!("Registered member #{} ({})", member.id, member.email);
            Ok(member)
        })
        .await
    }

    /// Apply profile changes. Fields left as `None` keep their stored value;
    /// a blank name is ignored, a blank phone or gender clears it.
    pub async fn update_profile(&self, id: i64, changes: UpdateMember) -> Result<Member> {
        with_conn(&self.pool, move |conn| {
            let mut member = load_member(conn, id)?.ok_or_else(|| AppError::not_found("Member"))?;

            if let Some(name) = changes.full_name.as_deref().map(str::trim) {
                if !name.is_empty() {
                    member.full_name = name.to_string();
                }
            }
            if let Some(phone) = changes.phone.as_deref() {
                member.phone = optional(Some(phone));
            }
            if let Some(gender) = changes.gender.as_deref() {
                member.gender = optional(Some(gender));
            }

            conn.execute(
                "UPDATE member SET full_name = ?, phone = ?, gender = ? WHERE member_id = ?",
                rusqlite::params![member.full_name, member.phone, member.gender, id],
            )?;

            tracing::debug!("Updated profile of member #{}", id);
            Ok(member)
        })
        .await
    }

    /// Delete a member together with everything they own.
    pub async fn delete(&self, id: i64) -> Result<bool> {
        with_conn(&self.pool, move |conn| {
            let rows = conn.execute("DELETE FROM member WHERE member_id = ?", [id])?;
            if rows > 0 {
                tracing::info!("Deleted member #{}", id);
            }
            Ok(rows > 0)
        })
        .await
    }
}

fn load_member(conn: &Connection, id: i64) -> rusqlite::Result<Option<Member>> {
    conn.query_row(
        "SELECT * FROM member WHERE member_id = ?",
        [id],
        Member::from_row,
    )
    .optional()
}
