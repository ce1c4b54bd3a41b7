//! Expiry severity classification and the reminder filter.

use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::error::TrackerError;
use crate::record::MedicineRecord;

const MILLIS_PER_DAY: i64 = 24 * 60 * 60 * 1000;

/// Last day count (inclusive) that is still `Critical`.
pub const CRITICAL_DAYS: i64 = 5;
/// Last day count (inclusive) that is still `Warning`.
pub const WARNING_DAYS: i64 = 31;

/// How urgent an expiry is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExpirySeverity {
    Expired,
    /// 0 to 5 days left.
    Critical,
    /// 6 to 31 days left.
    Warning,
    Normal,
}

impl ExpirySeverity {
    /// Whether the severity shows up in the reminder view.
    pub fn needs_reminder(self) -> bool {
        !matches!(self, ExpirySeverity::Normal)
    }

    pub fn label(self) -> &'static str {
        match self {
            ExpirySeverity::Expired => "expired",
            ExpirySeverity::Critical => "critical",
            ExpirySeverity::Warning => "warning",
            ExpirySeverity::Normal => "normal",
        }
    }

    /// Display color as a hex RGB string.
    pub fn color(self) -> &'static str {
        match self {
            ExpirySeverity::Expired | ExpirySeverity::Critical => "#E53935",
            ExpirySeverity::Warning => "#FF9800",
            ExpirySeverity::Normal => "#222222",
        }
    }
}

impl std::fmt::Display for ExpirySeverity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// Whole days from `reference` to `expiry`, partial days rounded up.
///
/// A few hours left gives 0; any instant strictly before `reference` by a day
/// or more gives a negative count.
pub fn days_until(expiry: DateTime<Utc>, reference: DateTime<Utc>) -> i64 {
    let diff = (expiry - reference).num_milliseconds();
    -(-diff).div_euclid(MILLIS_PER_DAY)
}

/// Maps a day count onto its severity band. First match wins.
pub fn severity_for_days(days: i64) -> ExpirySeverity {
    if days < 0 {
        ExpirySeverity::Expired
    } else if days <= CRITICAL_DAYS {
        ExpirySeverity::Critical
    } else if days <= WARNING_DAYS {
        ExpirySeverity::Warning
    } else {
        ExpirySeverity::Normal
    }
}

/// Classifies `expiry` relative to the calendar day `today`.
pub fn classify(expiry: NaiveDate, today: NaiveDate) -> ExpirySeverity {
    severity_for_days(days_until(start_of_day(expiry), start_of_day(today)))
}

/// Classifies `expiry` relative to a wall-clock instant.
///
/// The expiry date is taken as UTC midnight, so a medicine expiring earlier
/// today still has 0 days left.
pub fn classify_at(expiry: NaiveDate, now: DateTime<Utc>) -> ExpirySeverity {
    severity_for_days(days_until(start_of_day(expiry), now))
}

fn start_of_day(date: NaiveDate) -> DateTime<Utc> {
    date.and_time(NaiveTime::MIN).and_utc()
}

/// Parses a stored `YYYY-MM-DD` expiry. Anything but the zero-padded
/// 10-character form of a real calendar date is rejected.
pub fn parse_expiry_date(value: &str) -> Result<NaiveDate, TrackerError> {
    let bytes = value.as_bytes();
    let shaped = bytes.len() == 10
        && bytes.iter().enumerate().all(|(i, b)| match i {
            4 | 7 => *b == b'-',
            _ => b.is_ascii_digit(),
        });
    if !shaped {
        return Err(TrackerError::InvalidDate(value.to_string()));
    }

    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .map_err(|_| TrackerError::InvalidDate(value.to_string()))
}

/// Formats a date as `YYYY-MM-DD`.
pub fn format_expiry_date(date: NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}

/// A record that made it into the reminder view.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Reminder {
    pub record: MedicineRecord,
    pub severity: ExpirySeverity,
    pub days_left: i64,
}

/// Keeps the records that are expired or expire within the warning window,
/// in their original order.
///
/// Records without a readable expiry cannot be classified and are left out.
pub fn reminders(records: &[MedicineRecord], today: NaiveDate) -> Vec<Reminder> {
    let reference = start_of_day(today);

    records
        .iter()
        .filter_map(|record| {
            let expiry = match parse_expiry_date(&record.expiry) {
                Ok(date) => date,
                Err(err) => {
                    warn!(name = %record.name, %err, "skipping record in reminders");
                    return None;
                }
            };
            let days_left = days_until(start_of_day(expiry), reference);
            let severity = severity_for_days(days_left);
            severity.needs_reminder().then(|| Reminder {
                record: record.clone(),
                severity,
                days_left,
            })
        })
        .collect()
}
