use chrono::{NaiveDate, Utc};
use medtrack_core::{DecodedIdentity, MedicineRecord, Reminder, decode, parse_expiry_date};

use super::output::{print_one, print_out};
use crate::context::AppContext;

fn saved_row(record: &MedicineRecord) -> String {
    format!("Medicine saved! {}  (expires {})", record.name, record.expiry)
}

pub async fn add(ctx: &AppContext, name: &str, expiry: &str, json: bool) -> anyhow::Result<()> {
    let expiry = if expiry.is_empty() {
        None
    } else {
        Some(parse_expiry_date(expiry)?)
    };
    let record = ctx.service.add_manual(ctx.user(), name, expiry).await?;
    print_one(json, record, saved_row)
}

pub async fn scan(ctx: &AppContext, payload: &str, json: bool) -> anyhow::Result<()> {
    let record = ctx.service.add_scanned(ctx.user(), payload).await?;
    print_one(json, record, |r| {
        format!("GTIN: {}\nExpiry: {}\n{}", r.name, r.expiry, saved_row(r))
    })
}

pub fn decode_only(payload: &str, json: bool) -> anyhow::Result<()> {
    print_one(json, decode(payload), |d: &DecodedIdentity| {
        format!(
            "GTIN: {}\nExpiry: {}",
            d.product_code.as_deref().unwrap_or("-"),
            d.expiry_date.as_deref().unwrap_or("-")
        )
    })
}

pub async fn list(ctx: &AppContext, json: bool) -> anyhow::Result<()> {
    let records = ctx.service.list(ctx.user()).await?;
    print_out(json, &records, "No medicines found.", |r| {
        format!("{}  Expiry: {}", r.name, r.expiry)
    })
}

pub async fn reminders(ctx: &AppContext, today: Option<&str>, json: bool) -> anyhow::Result<()> {
    let today: NaiveDate = match today {
        Some(raw) => parse_expiry_date(raw)?,
        None => Utc::now().date_naive(),
    };
    let due = ctx.service.reminders(ctx.user(), today).await?;
    print_out(json, &due, "No medicines expiring soon.", reminder_row)
}

fn reminder_row(reminder: &Reminder) -> String {
    let when = match reminder.days_left {
        d if d < 0 => "(Expired)".to_string(),
        0 => "(today)".to_string(),
        1 => "(1 day left)".to_string(),
        d => format!("({d} days left)"),
    };
    format!(
        "[{}] {}  Expiry: {} {}",
        reminder.severity, reminder.record.name, reminder.record.expiry, when
    )
}
