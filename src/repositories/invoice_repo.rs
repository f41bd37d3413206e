use chrono::NaiveDateTime;
use rusqlite::{Connection, OptionalExtension};

use crate::db::{with_conn, DbPool};
use crate::error::{AppError, Result};
use crate::models::{CreateInvoice, FromSqliteRow, Invoice, InvoiceStatus};

use super::{optional, row_exists};

#[derive(Clone)]
pub struct InvoiceRepository {
    pool: DbPool,
}

impl InvoiceRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    pub async fn find_by_id(&self, id: i64) -> Result<Option<Invoice>> {
        with_conn(&self.pool, move |conn| Ok(load_invoice(conn, id)?)).await
    }

    pub async fn find_by_member(&self, member_id: i64) -> Result<Vec<Invoice>> {
        with_conn(&self.pool, move |conn| {
            let mut stmt = conn.prepare(
                "SELECT * FROM invoice WHERE member_id = ? ORDER BY issued_at DESC, invoice_id DESC",
            )?;
            let invoices = stmt
                .query_map([member_id], Invoice::from_row)?
                .collect::<rusqlite::Result<Vec<_>>>()?;
            Ok(invoices)
        })
        .await
    }

    /// Issue an invoice at `now`. When `mark_paid` is set it is created as
    /// paid and an absent due date becomes `now`.
    pub async fn create(&self, input: CreateInvoice, now: NaiveDateTime) -> Result<Invoice> {
        let description = optional(input.description.as_deref());
        let (status, due_at) = if input.mark_paid {
            (InvoiceStatus::Paid, input.due_at.or(Some(now)))
        } else {
            (InvoiceStatus::Unpaid, input.due_at)
        };

        with_conn(&self.pool, move |conn| {
            if !row_exists(conn, "member", "member_id", input.member_id)? {
                return Err(AppError::not_found("Member"));
            }

            conn.execute(
                "INSERT INTO invoice (member_id, amount, description, issued_at, due_at, status)
                 VALUES (?, ?, ?, ?, ?, ?)",
                rusqlite::params![
                    input.member_id,
                    input.amount,
                    description,
                    now,
                    due_at,
                    status.as_str()
                ],
            )?;

            let invoice = Invoice {
                id: conn.last_insert_rowid(),
                member_id: input.member_id,
                amount: input.amount,
                description,
                issued_at: now,
                due_at,
                status,
            };
            tracing::info!(
                "Issued invoice #{} to member #{} ({})",
                invoice.id,
                invoice.member_id,
                status.as_str()
            );
            Ok(invoice)
        })
        .await
    }

    /// Set the status directly. Marking an invoice paid fills a missing due
    /// date with `now`; other transitions, including PAID back to UNPAID, are
    /// accepted as-is.
    pub async fn set_status(
        &self,
        id: i64,
        status: InvoiceStatus,
        now: NaiveDateTime,
    ) -> Result<Invoice> {
        with_conn(&self.pool, move |conn| {
            let rows = match status {
                InvoiceStatus::Paid => conn.execute(
                    "UPDATE invoice SET status = ?, due_at = COALESCE(due_at, ?) WHERE invoice_id = ?",
                    rusqlite::params![status.as_str(), now, id],
                )?,
                InvoiceStatus::Unpaid => conn.execute(
                    "UPDATE invoice SET status = ? WHERE invoice_id = ?",
                    rusqlite::params![status.as_str(), id],
                )?,
            };
            if rows == 0 {
                return Err(AppError::not_found("Invoice"));
            }

            tracing::info!("Invoice #{} marked {}", id, status.as_str());
            load_invoice(conn, id)?.ok_or_else(|| AppError::not_found("Invoice"))
        })
        .await
    }
}

fn load_invoice(conn: &Connection, id: i64) -> rusqlite::Result<Option<Invoice>> {
    conn.query_row(
        "SELECT * FROM invoice WHERE invoice_id = ?",
        [id],
        Invoice::from_row,
    )
    .optional()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repositories::testing::{at, insert_member, setup_test_db};

    fn new_invoice(member_id: i64, mark_paid: bool) -> CreateInvoice {
        CreateInvoice {
            member_id,
            amount: 55.0,
            description: Some("Monthly fee".to_string()),
            due_at: None,
            mark_paid,
        }
    }

    #[tokio::test]
    async fn test_create_unpaid_invoice() {
        let pool = setup_test_db();
        let member = insert_member(&pool, "Mia", "mia@example.com");
        let repo = InvoiceRepository::new(pool);

        let invoice = repo.create(new_invoice(member, false), at(1, 9, 0)).await.unwrap();

        assert_eq!(invoice.status, InvoiceStatus::Unpaid);
        assert_eq!(invoice.due_at, None);
        assert_eq!(invoice.issued_at, at(1, 9, 0));
        assert_eq!(repo.find_by_id(invoice.id).await.unwrap(), Some(invoice));
    }

    #[tokio::test]
    async fn test_create_paid_invoice_sets_due_date() {
        let pool = setup_test_db();
        let member = insert_member(&pool, "Mia", "mia@example.com");
        let repo = InvoiceRepository::new(pool);

        let invoice = repo.create(new_invoice(member, true), at(1, 9, 0)).await.unwrap();

        assert_eq!(invoice.status, InvoiceStatus::Paid);
        assert_eq!(invoice.due_at, Some(at(1, 9, 0)));
    }

    #[tokio::test]
    async fn test_mark_paid_keeps_existing_due_date() {
        let pool = setup_test_db();
        let member = insert_member(&pool, "Mia", "mia@example.com");
        let repo = InvoiceRepository::new(pool);

        let mut input = new_invoice(member, false);
        input.due_at = Some(at(30, 0, 0));
        let with_due = repo.create(input, at(1, 9, 0)).await.unwrap();
        let without_due = repo.create(new_invoice(member, false), at(1, 9, 0)).await.unwrap();

        let paid = repo
            .set_status(with_due.id, InvoiceStatus::Paid, at(5, 12, 0))
            .await
            .unwrap();
        assert_eq!(paid.due_at, Some(at(30, 0, 0)));

        let paid = repo
            .set_status(without_due.id, InvoiceStatus::Paid, at(5, 12, 0))
            .await
            .unwrap();
        assert_eq!(paid.due_at, Some(at(5, 12, 0)));

        let reverted = repo
            .set_status(without_due.id, InvoiceStatus::Unpaid, at(6, 12, 0))
            .await
            .unwrap();
        assert_eq!(reverted.status, InvoiceStatus::Unpaid);

        assert_eq!(repo.find_by_member(member).await.unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_invoice_for_missing_member_or_invoice() {
        let pool = setup_test_db();
        let repo = InvoiceRepository::new(pool);

        let err = repo.create(new_invoice(12, false), at(1, 9, 0)).await.unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));

        let err = repo
            .set_status(12, InvoiceStatus::Paid, at(1, 9, 0))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
    }
}
