pub mod classes;
pub mod health;
pub mod invoices;
pub mod members;
pub mod rooms;
pub mod sessions;
pub mod trainers;

use chrono::NaiveDateTime;

/// Wall-clock time used for timestamps the client does not supply.
pub(crate) fn local_now() -> NaiveDateTime {
    chrono::Local::now().naive_local()
}
