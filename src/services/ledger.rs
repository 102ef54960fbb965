use serde::Serialize;

use crate::models::Payment;

pub const MONTHS_PER_YEAR: usize = 12;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum PaymentStatus {
    Paid,
    Partial,
    Unpaid,
}

/// One calendar month of the reconciled ledger.
#[derive(Debug, Clone, Serialize)]
pub struct MonthEntry {
    pub month: i32,
    pub due: f64,
    #[serde(rename = "recv")]
    pub received: f64,
    pub late: f64,
    pub status: PaymentStatus,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct LedgerTotals {
    pub due: f64,
    pub received: f64,
    pub late: f64,
    pub paid_months: i64,
}

/// Paid when the full due amount (or more) actually arrived; partial when
/// something arrived but not enough; unpaid otherwise. A month with
/// due == 0 and received == 0 classifies as unpaid.
pub fn classify(due: f64, received: f64) -> PaymentStatus {
    if received > 0.0 && received >= due {
        PaymentStatus::Paid
    } else if received > 0.0 {
        PaymentStatus::Partial
    } else {
        PaymentStatus::Unpaid
    }
}

/// Merge the sparse payment rows of one property/year into a complete
/// 12-month ledger. Months without a recorded payment fall back to the
/// property's base rent as the expected due amount, so a base-rent change
/// retroactively reshapes the displayed due for unrecorded months.
pub fn reconcile_year(base_rent: f64, payments: &[Payment]) -> Vec<MonthEntry> {
    (1..=MONTHS_PER_YEAR as i32)
        .map(|month| {
            let payment = payments.iter().find(|p| p.month == month);
            let due = payment.map_or(base_rent, |p| p.rent_due);
            let received = payment.map_or(0.0, |p| p.rent_received);
            let late = payment.map_or(0.0, |p| p.late_fee);
            MonthEntry {
                month,
                due,
                received,
                late,
                status: classify(due, received),
            }
        })
        .collect()
}

pub fn totals(months: &[MonthEntry]) -> LedgerTotals {
    let mut acc = LedgerTotals::default();
    for entry in months {
        acc.due += entry.due;
        acc.received += entry.received;
        acc.late += entry.late;
        if entry.status == PaymentStatus::Paid {
            acc.paid_months += 1;
        }
    }
    acc
}
