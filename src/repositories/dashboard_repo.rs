use rusqlite::OptionalExtension;

use crate::db::{with_conn, DbPool};
use crate::error::Result;
use crate::models::{FromSqliteRow, MemberDashboard};

/// Read-only lookups over `member_dashboard_view`.
#[derive(Clone)]
pub struct DashboardRepository {
    pool: DbPool,
}

impl DashboardRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    /// `None` only when the member does not exist; a member without goals or
    /// metrics still gets a dashboard.
    pub async fn member_dashboard(&self, member_id: i64) -> Result<Option<MemberDashboard>> {
        with_conn(&self.pool, move |conn| {
            let dashboard = conn
                .query_row(
                    "SELECT * FROM member_dashboard_view WHERE member_id = ?",
                    [member_id],
                    MemberDashboard::from_row,
                )
                .optional()?;
            Ok(dashboard)
        })
        .await
    }

    /// Case-insensitive substring search on the member's full name, ordered
    /// by name. Names are folded with `str::to_lowercase`; SQLite's `LIKE`
    /// and `NOCASE` only fold ASCII, so the match happens here.
    pub async fn search_members(&self, query: &str) -> Result<Vec<MemberDashboard>> {
        let needle = query.trim().to_lowercase();

        with_conn(&self.pool, move |conn| {
            let mut stmt = conn.prepare("SELECT * FROM member_dashboard_view")?;
            let mut members = stmt
                .query_map([], MemberDashboard::from_row)?
                .filter_map(|row| match row {
                    Ok(member) => {
                        let folded = member.full_name.to_lowercase();
                        folded.contains(&needle).then_some(Ok((folded, member)))
                    }
                    Err(e) => Some(Err(e)),
                })
                .collect::<rusqlite::Result<Vec<_>>>()?;

            members.sort_by(|(a_name, a), (b_name, b)| {
                a_name.cmp(b_name).then(a.member_id.cmp(&b.member_id))
            });
            Ok(members.into_iter().map(|(_, member)| member).collect())
        })
        .await
    }
}
