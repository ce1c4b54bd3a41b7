//! GS1 Application Identifier payload decoding.
//!
//! A scanned GS1 barcode (DataBar, GS1-128, DataMatrix) yields human-readable
//! text made of concatenated `(AI)value` segments, e.g.
//! `(01)12345678901234(17)260115(10)LOT42`. Only the two identifiers needed
//! to register a medicine are extracted:
//!
//! - AI `01`: the 14-digit GTIN.
//! - AI `17`: the `YYMMDD` expiry date, expanded to `20YY-MM-DD`.
//!
//! Both values are fixed width. A digit run that is shorter or longer than
//! the expected width is rejected rather than truncated.

use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::error::TrackerError;

const GTIN_LEN: usize = 14;

static GTIN_SEGMENT: LazyLock<Regex> =
    LazyLock::new(|| fixed_width_segment("01", GTIN_LEN));
static EXPIRY_SEGMENT: LazyLock<Regex> = LazyLock::new(|| fixed_width_segment("17", 6));

/// `(AI)` followed by exactly `width` ASCII digits and then a non-digit or the end.
fn fixed_width_segment(ai: &str, width: usize) -> Regex {
    let pattern = format!(r"\({ai}\)([0-9]{{{width}}})(?:[^0-9]|$)");
    Regex::new(&pattern).expect("static GS1 pattern is valid")
}

/// Fields recovered from one scanned payload. Either may be missing.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DecodedIdentity {
    /// 14-digit GTIN from AI 01.
    pub product_code: Option<String>,
    /// Expiry from AI 17 as `YYYY-MM-DD`.
    pub expiry_date: Option<String>,
}

impl DecodedIdentity {
    /// True when neither identifier was found.
    pub fn is_empty(&self) -> bool {
        self.product_code.is_none() && self.expiry_date.is_none()
    }

    /// Returns `(gtin, expiry)` when both are present.
    ///
    /// A record can only be added from a scan that yielded both values; a
    /// partial decode is reported as [`TrackerError::ExtractionFailed`].
    pub fn require_complete(self) -> Result<(String, String), TrackerError> {
        match (self.product_code, self.expiry_date) {
            (Some(gtin), Some(expiry)) => Ok((gtin, expiry)),
            _ => Err(TrackerError::ExtractionFailed),
        }
    }
}

/// Decodes a raw GS1 text payload. Never fails; absent segments stay `None`.
pub fn decode(payload: &str) -> DecodedIdentity {
    let product_code = first_capture(&GTIN_SEGMENT, payload).map(str::to_string);
    let expiry_date = first_capture(&EXPIRY_SEGMENT, payload).map(expand_yymmdd);

    DecodedIdentity {
        product_code,
        expiry_date,
    }
}

fn first_capture<'a>(re: &Regex, haystack: &'a str) -> Option<&'a str> {
    re.captures(haystack)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str())
}

/// `YYMMDD` to `20YY-MM-DD`. The century is always assumed to be 2000-2099,
/// which stored records already depend on.
fn expand_yymmdd(digits: &str) -> String {
    let (yy, rest) = digits.split_at(2);
    let (mm, dd) = rest.split_at(2);
    format!("20{yy}-{mm}-{dd}")
}
