use chrono::NaiveDateTime;
use rusqlite::Row;
use serde::{Deserialize, Serialize};

use super::FromSqliteRow;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum InvoiceStatus {
    #[default]
    Unpaid,
    Paid,
}

impl InvoiceStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            InvoiceStatus::Unpaid => "UNPAID",
            InvoiceStatus::Paid => "PAID",
        }
    }

    pub fn parse(s: &str) -> Self {
        match s {
            "PAID" => InvoiceStatus::Paid,
            _ => InvoiceStatus::Unpaid,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Invoice {
    pub id: i64,
    pub member_id: i64,
    pub amount: f64,
    pub description: Option<String>,
    pub issued_at: NaiveDateTime,
    pub due_at: Option<NaiveDateTime>,
    pub status: InvoiceStatus,
}

impl FromSqliteRow for Invoice {
    fn from_row(row: &Row) -> rusqlite::Result<Self> {
        let status: String = row.get("status")?;
        Ok(Self {
            id: row.get("invoice_id")?,
            member_id: row.get("member_id")?,
            amount: row.get("amount")?,
            description: row.get("description")?,
            issued_at: row.get("issued_at")?,
            due_at: row.get("due_at")?,
            status: InvoiceStatus::parse(&status),
        })
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct CreateInvoice {
    pub member_id: i64,
    pub amount: f64,
    pub description: Option<String>,
    pub due_at: Option<NaiveDateTime>,
    #[serde(default)]
    pub mark_paid: bool,
}

#[derive(Debug, Clone, Deserialize)]
pub struct UpdateInvoiceStatus {
    pub status: InvoiceStatus,
}
