//! Per-row field derivation.
//!
//! Maps one [`InputRecord`] onto an [`OutputRecord`]: title-cased names,
//! rounded measurements, square footage and pass-through columns. Run
//! numbering and fill-down happen afterwards in [`super::grouper`].

use once_cell::sync::Lazy;
use regex::{Captures, Regex};

use crate::error::{TransformError, TransformResult};
use crate::models::{source, FieldValue, InputRecord, OutputRecord};

/// Inches per foot.
const INCHES_PER_FOOT: f64 = 12.0;

/// A word for title-casing: a maximal run of letters.
static WORD: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\p{Alphabetic}+").expect("word pattern is valid"));

/// Upper-case the first letter of every word and lower-case the rest.
///
/// Digits and punctuation split words, so `"o'neil 2b"` becomes `"O'Neil 2B"`.
pub fn title_case(text: &str) -> String {
    WORD.replace_all(text, |caps: &Captures| {
        let mut chars = caps[0].chars();
        match chars.next() {
            Some(first) => first
                .to_uppercase()
                .chain(chars.flat_map(char::to_lowercase))
                .collect(),
            None => String::new(),
        }
    })
    .into_owned()
}

/// Round to two decimals, ties to even.
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round_ties_even() / 100.0
}

/// Read a measurement column, substituting `default` when absent.
///
/// `row` is 1-based and only used for error reporting.
fn measurement(
    record: &InputRecord,
    column: &str,
    default: f64,
    row: usize,
) -> TransformResult<f64> {
    match record.get(column) {
        FieldValue::Empty => Ok(default),
        FieldValue::Number(n) => Ok(*n),
        FieldValue::Text(s) if s.trim().is_empty() => Ok(default),
        FieldValue::Text(s) => s
            .trim()
            .parse::<f64>()
            .ok()
            .filter(|n| n.is_finite())
            .ok_or_else(|| TransformError::NotANumber {
                column: column.to_string(),
                row,
                value: s.clone(),
            }),
    }
}

/// Derive one report row. `row` is the 1-based data row number.
///
/// Sr No is left unset and Count at 1; contacts are copied as-is.
pub fn derive_record(record: &InputRecord, row: usize) -> TransformResult<OutputRecord> {
    let width_inch = round2(measurement(record, source::WIDTH_INCH, 0.0, row)?);
    let height_inch = round2(measurement(record, source::HEIGHT_INCH, 0.0, row)?);
    let width_ft = round2(width_inch / INCHES_PER_FOOT);
    let height_ft = round2(height_inch / INCHES_PER_FOOT);
    let quantity = round2(measurement(record, source::QUANTITY, 1.0, row)?);
    let total_sqft = round2(width_ft * height_ft * quantity);

    // Kept verbatim: two missing name parts still yield " ".
    let recce_done_by = format!(
        "{} {}",
        record.text(source::AGENT_FIRST_NAME),
        record.text(source::AGENT_LAST_NAME)
    );

    Ok(OutputRecord {
        sr_no: None,
        shop_name: title_case(&record.text(source::STORE_TITLE)),
        count: 1,
        elements: record.get(source::ELEMENT_NAME).clone(),
        product_name: title_case(&record.text(source::BRAND_NAME)),
        width_inch,
        height_inch,
        width_ft,
        height_ft,
        quantity,
        total_sqft,
        remark: record.get(source::ADDITIONAL_INFO).clone(),
        recce_done_by,
        sales_person: record.get(source::SALES_PERSON).clone(),
        recce_date: record.get(source::AUDITED_ON).clone(),
        location: record.get(source::STORE_LOCATION).clone(),
        latitude: record.get(source::LATITUDE).clone(),
        longitude: record.get(source::LONGITUDE).clone(),
        address: record.get(source::STORE_ADDRESS).clone(),
        pincode: record.get(source::STORE_PINCODE).clone(),
        contact_number: record.get(source::CONTACT_NUMBER).clone(),
        contact_person: record.get(source::CONTACT_PERSON).clone(),
    })
}
