pub mod ledger;
pub mod receipts;
pub mod reports;
