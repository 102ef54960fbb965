use std::collections::BTreeMap;

use chrono::NaiveDate;
use url::form_urlencoded;

use crate::models::{Payment, Property, Tenant};

const MONTH_NAMES: [&str; 12] = [
    "January",
    "February",
    "March",
    "April",
    "May",
    "June",
    "July",
    "August",
    "September",
    "October",
    "November",
    "December",
];

const BANNER: &str = "================================================";

/// Landlord contact block for the receipt footer, read from settings.
#[derive(Debug, Clone, Default)]
pub struct LandlordProfile {
    pub name: String,
    pub phone: String,
    pub email: String,
}

impl LandlordProfile {
    pub fn from_settings(settings: &BTreeMap<String, String>) -> Self {
        let read = |key: &str| settings.get(key).cloned().unwrap_or_default();
        Self {
            name: read("ll_name"),
            phone: read("ll_phone"),
            email: read("ll_email"),
        }
    }
}

#[derive(Debug, Clone)]
pub struct RenderedReceipt {
    pub subject: String,
    pub body: String,
    pub gmail_url: String,
    pub total_received: f64,
}

pub fn month_name(month: i32) -> Option<&'static str> {
    MONTH_NAMES.get(month.checked_sub(1)? as usize).copied()
}

/// Deterministic receipt identifier: alphanumeric-only uppercased property
/// name, 3-letter month abbreviation, year.
pub fn receipt_number(property_name: &str, month: i32, year: i32) -> Option<String> {
    let compact: String = property_name
        .chars()
        .filter(char::is_ascii_alphanumeric)
        .map(|c| c.to_ascii_uppercase())
        .collect();
    let abbrev = month_name(month)?[..3].to_ascii_uppercase();
    Some(format!("{compact}-{abbrev}-{year}"))
}

/// Render the fixed-layout plain-text receipt and its Gmail compose link.
/// With no payment row for the period, the property's base rent is owed
/// and nothing has been received. Returns None for an invalid month.
pub fn render_receipt(
    property: &Property,
    tenant: &Tenant,
    payment: Option<&Payment>,
    month: i32,
    year: i32,
    landlord: &LandlordProfile,
    today: NaiveDate,
) -> Option<RenderedReceipt> {
    let month_label = month_name(month)?;
    let number = receipt_number(&property.name, month, year)?;

    let due = payment.map_or(property.base_rent, |p| p.rent_due);
    let received = payment.map_or(0.0, |p| p.rent_received);
    let late = payment.map_or(0.0, |p| p.late_fee);
    let total = received + late;

    let status = if received >= due && due > 0.0 {
        "PAID IN FULL".to_string()
    } else if received > 0.0 && received < due {
        format!("PARTIAL - Balance: ${:.2}", due - received)
    } else {
        format!("BALANCE DUE: ${due:.2}")
    };

    let address = if property.address.is_empty() {
        "N/A"
    } else {
        property.address.as_str()
    };
    let dated = today.format("%B %-d, %Y").to_string();

    let mut lines = vec![
        format!("Hi {},", tenant.name),
        String::new(),
        format!("Your rent receipt for {month_label} {year}:"),
        String::new(),
        BANNER.to_string(),
        "          RENTDESK PROPERTY MANAGEMENT".to_string(),
        "           OFFICIAL RENT RECEIPT".to_string(),
        BANNER.to_string(),
        format!("  Property  : {}", property.label),
        format!("  Address   : {address}"),
        format!("  Tenant    : {}", tenant.name),
        format!("  Period    : {month_label} {year}"),
        format!("  Receipt # : {number}"),
        format!("  Date      : {dated}"),
        String::new(),
        format!("  Rent Due        : ${due:.2}"),
        format!("  Rent Received   : ${received:.2}"),
    ];
    if late > 0.0 {
        lines.push(format!("  Late Fee        : ${late:.2}"));
    }
    lines.extend([
        "  .............................................".to_string(),
        format!("  TOTAL RECEIVED  : ${total:.2}"),
        String::new(),
        format!("  >> STATUS: {status}"),
        String::new(),
        BANNER.to_string(),
        "Thank you for your payment!".to_string(),
        String::new(),
        landlord.name.clone(),
        landlord.phone.clone(),
        landlord.email.clone(),
        BANNER.to_string(),
    ]);
    let body = lines.join("\n");

    let subject = format!("Rent Receipt - {} - {month_label} {year}", property.label);
    let query = form_urlencoded::Serializer::new(String::new())
        .append_pair("view", "cm")
        .append_pair("to", &tenant.email)
        .append_pair("su", &subject)
        .append_pair("body", &body)
        .finish();

    Some(RenderedReceipt {
        subject,
        body,
        gmail_url: format!("https://mail.google.com/mail/?{query}"),
        total_received: total,
    })
}
