use serde::Serialize;
use sqlx::SqlitePool;

use crate::models::CategoryTotal;
use crate::repository::{expenses, payments, properties};
use crate::services::ledger::{self, MonthEntry, MONTHS_PER_YEAR};

#[derive(Debug, Clone, Serialize)]
pub struct DashboardProperty {
    pub id: i64,
    pub label: String,
    pub base_rent: f64,
    pub tenant_name: Option<String>,
    pub months: Vec<MonthEntry>,
    #[serde(rename = "tDue")]
    pub total_due: f64,
    #[serde(rename = "tRecv")]
    pub total_received: f64,
    #[serde(rename = "tLate")]
    pub total_late: f64,
    #[serde(rename = "tExp")]
    pub total_expenses: f64,
    pub net: f64,
    pub paid: i64,
}

#[derive(Debug, Clone, Serialize)]
pub struct MonthlyCollection {
    pub month: i32,
    pub collected: f64,
    pub due: f64,
}

#[derive(Debug, Clone, Serialize)]
pub struct DashboardReport {
    pub properties: Vec<DashboardProperty>,
    pub monthly: Vec<MonthlyCollection>,
    pub year: i32,
}

/// Run the reconciliation engine once per property and fold the results
/// into the portfolio-wide monthly series.
pub async fn dashboard(pool: &SqlitePool, year: i32) -> Result<DashboardReport, sqlx::Error> {
    let overviews = properties::list_overviews(pool).await?;
    let mut report = Vec::with_capacity(overviews.len());

    for property in overviews {
        let rows = payments::list_for_year(pool, property.id, year).await?;
        let months = ledger::reconcile_year(property.base_rent, &rows);
        let sums = ledger::totals(&months);
        let total_expenses = expenses::total_for_year(pool, property.id, year).await?;

        report.push(DashboardProperty {
            id: property.id,
            label: property.label,
            base_rent: property.base_rent,
            tenant_name: property.tenant_name,
            net: sums.received + sums.late - total_expenses,
            total_due: sums.due,
            total_received: sums.received,
            total_late: sums.late,
            total_expenses,
            paid: sums.paid_months,
            months,
        });
    }

    let monthly = portfolio_monthly(&report);
    Ok(DashboardReport {
        properties: report,
        monthly,
        year,
    })
}

/// Cross-property fold of the per-property month entries; no queries.
fn portfolio_monthly(properties: &[DashboardProperty]) -> Vec<MonthlyCollection> {
    (0..MONTHS_PER_YEAR)
        .map(|index| {
            let mut collected = 0.0;
            let mut due = 0.0;
            for property in properties {
                collected += property.months[index].received;
                due += property.months[index].due;
            }
            MonthlyCollection {
                month: index as i32 + 1,
                collected,
                due,
            }
        })
        .collect()
}

#[derive(Debug, Clone, Serialize)]
pub struct TaxReportProperty {
    pub id: i64,
    pub label: String,
    pub address: String,
    pub tenant_name: Option<String>,
    #[serde(rename = "totalRecv")]
    pub total_received: f64,
    #[serde(rename = "totalLate")]
    pub total_late: f64,
    #[serde(rename = "grossIncome")]
    pub gross_income: f64,
    pub expenses: Vec<CategoryTotal>,
    #[serde(rename = "totalExp")]
    pub total_expenses: f64,
    #[serde(rename = "netIncome")]
    pub net_income: f64,
}

#[derive(Debug, Clone, Serialize)]
pub struct TaxReport {
    pub year: i32,
    pub properties: Vec<TaxReportProperty>,
    #[serde(rename = "grandIncome")]
    pub grand_income: f64,
    #[serde(rename = "grandExp")]
    pub grand_expenses: f64,
    #[serde(rename = "grandNet")]
    pub grand_net: f64,
    #[serde(rename = "allCategories")]
    pub all_categories: Vec<CategoryTotal>,
}

/// Cash-basis annual summary. Income sums only the payment rows that
/// exist; missing months are never back-filled with base rent here, which
/// is why this figure can sit below the dashboard's expected-income view.
pub async fn tax_report(pool: &SqlitePool, year: i32) -> Result<TaxReport, sqlx::Error> {
    let overviews = properties::list_overviews(pool).await?;
    let mut report = Vec::with_capacity(overviews.len());

    for property in overviews {
        let (total_received, total_late) =
            payments::received_totals_for_year(pool, property.id, year).await?;
        let by_category = expenses::category_totals_for_property(pool, property.id, year).await?;
        let total_expenses: f64 = by_category.iter().map(|entry| entry.total).sum();
        let gross_income = total_received + total_late;

        report.push(TaxReportProperty {
            id: property.id,
            label: property.label,
            address: property.address,
            tenant_name: property.tenant_name,
            total_received,
            total_late,
            gross_income,
            expenses: by_category,
            total_expenses,
            net_income: gross_income - total_expenses,
        });
    }

    let grand_income: f64 = report.iter().map(|entry| entry.gross_income).sum();
    let grand_expenses: f64 = report.iter().map(|entry| entry.total_expenses).sum();
    let all_categories = expenses::category_totals_for_year(pool, year).await?;

    Ok(TaxReport {
        year,
        properties: report,
        grand_income,
        grand_expenses,
        grand_net: grand_income - grand_expenses,
        all_categories,
    })
}
