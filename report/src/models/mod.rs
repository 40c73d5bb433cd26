//! Domain models for the recce report pipeline.
//!
//! - [`FieldValue`] - Loosely typed cell value (text, number, or absent)
//! - [`InputRecord`] - One row of a recce export, keyed by source header
//! - [`OutputRecord`] - One derived report row
//! - [`TotalRow`] - Aggregates behind the trailing total row
//! - [`OutputTable`] - All report rows of one file plus its totals

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

// =============================================================================
// Source field names
// =============================================================================

/// Header names of the recce export columns the report consumes.
pub mod source {
    pub const STORE_TITLE: &str = "storeTitle";
    pub const ELEMENT_NAME: &str = "Element Name";
    pub const BRAND_NAME: &str = "Brand Name";
    pub const WIDTH_INCH: &str = "Width In Inch";
    pub const HEIGHT_INCH: &str = "Height In Inch";
    pub const QUANTITY: &str = "Quantity";
    pub const ADDITIONAL_INFO: &str = "Additional Information";
    pub const AGENT_FIRST_NAME: &str = "agentFirstName";
    pub const AGENT_LAST_NAME: &str = "agentLastName";
    pub const SALES_PERSON: &str = "Sales Person Name";
    pub const AUDITED_ON: &str = "auditedOn";
    pub const STORE_LOCATION: &str = "storeLocation";
    pub const LATITUDE: &str = "latitude";
    pub const LONGITUDE: &str = "longitude";
    pub const STORE_ADDRESS: &str = "storeAddress";
    pub const STORE_PINCODE: &str = "storePincode";
    pub const CONTACT_NUMBER: &str = "Shop Owner Contact Number";
    pub const CONTACT_PERSON: &str = "Shop Owner's Name";

    /// Columns that must hold numbers when present.
    pub const MEASUREMENTS: [&str; 3] = [WIDTH_INCH, HEIGHT_INCH, QUANTITY];
}

// =============================================================================
// Report columns
// =============================================================================

/// Report columns, in output order.
pub const OUTPUT_COLUMNS: [&str; 26] = [
    "Sr No",
    "Shop Name",
    "Count",
    "Elements",
    "Product Name",
    "W in Inch",
    "H in Inch",
    "W in Ft",
    "H in Ft",
    "Quantity",
    "Total Sqft",
    "Remark",
    "Recce Done By",
    "Sales Person",
    "Recce Date",
    "Vendor Detail",
    "Execution Status",
    "Execution Date",
    "Location",
    "Location Link",
    "Lat",
    "Long",
    "Address",
    "Pincode",
    "Contact Number",
    "Contact Person",
];

/// Zero-based index of "Sr No".
pub const SR_NO_COLUMN: usize = 0;

/// Zero-based index of "Total Sqft".
pub const TOTAL_SQFT_COLUMN: usize = 10;

/// Zero-based, inclusive column span of the merged "TOTAL" label (B..J).
pub const TOTAL_LABEL_COLUMNS: (usize, usize) = (1, 9);

/// Columns displayed with a fixed two-decimal number format.
pub const TWO_DECIMAL_COLUMNS: [&str; 3] = ["W in Ft", "H in Ft", "Total Sqft"];

// =============================================================================
// Field Value
// =============================================================================

/// A loosely typed cell value.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FieldValue {
    /// No value.
    #[default]
    Empty,
    /// Numeric value.
    Number(f64),
    /// Text value.
    Text(String),
}

impl FieldValue {
    /// True for absent values and empty strings.
    pub fn is_empty(&self) -> bool {
        match self {
            FieldValue::Empty => true,
            FieldValue::Text(s) => s.is_empty(),
            FieldValue::Number(_) => false,
        }
    }

    pub fn as_number(&self) -> Option<f64> {
        match self {
            FieldValue::Number(n) => Some(*n),
            _ => None,
        }
    }

    /// Text rendering of the value; absent values render as "".
    pub fn to_text(&self) -> String {
        match self {
            FieldValue::Empty => String::new(),
            FieldValue::Number(n) => format_number(*n),
            FieldValue::Text(s) => s.clone(),
        }
    }
}

impl From<&str> for FieldValue {
    fn from(s: &str) -> Self {
        FieldValue::Text(s.to_string())
    }
}

impl From<String> for FieldValue {
    fn from(s: String) -> Self {
        FieldValue::Text(s)
    }
}

impl From<f64> for FieldValue {
    fn from(n: f64) -> Self {
        FieldValue::Number(n)
    }
}

/// Integers print without a fractional part, everything else as the
/// shortest round-trip representation.
pub fn format_number(n: f64) -> String {
    if n.is_finite() && n.fract() == 0.0 && n.abs() < 1e15 {
        format!("{}", n as i64)
    } else {
        n.to_string()
    }
}

// =============================================================================
// Input Record
// =============================================================================

static ABSENT: FieldValue = FieldValue::Empty;

/// One source row, keyed by header name.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct InputRecord {
    fields: HashMap<String, FieldValue>,
}

impl InputRecord {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert, handy for tests and fixtures.
    pub fn with(mut self, field: impl Into<String>, value: impl Into<FieldValue>) -> Self {
        self.insert(field, value);
        self
    }

    pub fn insert(&mut self, field: impl Into<String>, value: impl Into<FieldValue>) {
        self.fields.insert(field.into(), value.into());
    }

    /// Value of a field; missing fields read as [`FieldValue::Empty`].
    pub fn get(&self, field: &str) -> &FieldValue {
        self.fields.get(field).unwrap_or(&ABSENT)
    }

    /// Text rendering of a field; missing fields read as "".
    pub fn text(&self, field: &str) -> String {
        self.get(field).to_text()
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

// =============================================================================
// Output Record
// =============================================================================

/// One row of the recce report.
///
/// `sr_no`, `count`, `contact_number` and `contact_person` hold their
/// per-row values until the grouping pass rewrites them.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OutputRecord {
    #[serde(rename = "Sr No")]
    pub sr_no: Option<u32>,
    #[serde(rename = "Shop Name")]
    pub shop_name: String,
    #[serde(rename = "Count")]
    pub count: u32,
    #[serde(rename = "Elements")]
    pub elements: FieldValue,
    #[serde(rename = "Product Name")]
    pub product_name: String,
    #[serde(rename = "W in Inch")]
    pub width_inch: f64,
    #[serde(rename = "H in Inch")]
    pub height_inch: f64,
    #[serde(rename = "W in Ft")]
    pub width_ft: f64,
    #[serde(rename = "H in Ft")]
    pub height_ft: f64,
    #[serde(rename = "Quantity")]
    pub quantity: f64,
    #[serde(rename = "Total Sqft")]
    pub total_sqft: f64,
    #[serde(rename = "Remark")]
    pub remark: FieldValue,
    #[serde(rename = "Recce Done By")]
    pub recce_done_by: String,
    #[serde(rename = "Sales Person")]
    pub sales_person: FieldValue,
    #[serde(rename = "Recce Date")]
    pub recce_date: FieldValue,
    #[serde(rename = "Location")]
    pub location: FieldValue,
    #[serde(rename = "Lat")]
    pub latitude: FieldValue,
    #[serde(rename = "Long")]
    pub longitude: FieldValue,
    #[serde(rename = "Address")]
    pub address: FieldValue,
    #[serde(rename = "Pincode")]
    pub pincode: FieldValue,
    #[serde(rename = "Contact Number")]
    pub contact_number: FieldValue,
    #[serde(rename = "Contact Person")]
    pub contact_person: FieldValue,
}

impl OutputRecord {
    /// Cell values in [`OUTPUT_COLUMNS`] order.
    pub fn cells(&self) -> Vec<FieldValue> {
        vec![
            self.sr_no
                .map(|n| FieldValue::Number(n as f64))
                .unwrap_or_default(),
            FieldValue::Text(self.shop_name.clone()),
            FieldValue::Number(self.count as f64),
            self.elements.clone(),
            FieldValue::Text(self.product_name.clone()),
            FieldValue::Number(self.width_inch),
            FieldValue::Number(self.height_inch),
            FieldValue::Number(self.width_ft),
            FieldValue::Number(self.height_ft),
            FieldValue::Number(self.quantity),
            FieldValue::Number(self.total_sqft),
            self.remark.clone(),
            FieldValue::Text(self.recce_done_by.clone()),
            self.sales_person.clone(),
            self.recce_date.clone(),
            FieldValue::Empty, // Vendor Detail
            FieldValue::Empty, // Execution Status
            FieldValue::Empty, // Execution Date
            self.location.clone(),
            FieldValue::Empty, // Location Link
            self.latitude.clone(),
            self.longitude.clone(),
            self.address.clone(),
            self.pincode.clone(),
            self.contact_number.clone(),
            self.contact_person.clone(),
        ]
    }
}

// =============================================================================
// Output Table
// =============================================================================

/// Aggregates shown in the trailing total row.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TotalRow {
    /// Number of data rows above the total row.
    pub data_rows: usize,
    /// Number of non-blank Sr No cells, i.e. shop runs.
    pub run_count: usize,
    /// Arithmetic sum of every row's Total Sqft.
    pub total_sqft: f64,
}

/// Every report row of one input file, followed by its totals.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OutputTable {
    pub records: Vec<OutputRecord>,
    pub total: TotalRow,
}

impl OutputTable {
    pub fn new(records: Vec<OutputRecord>) -> Self {
        let total = TotalRow {
            data_rows: records.len(),
            run_count: records.iter().filter(|r| r.sr_no.is_some()).count(),
            total_sqft: records.iter().map(|r| r.total_sqft).sum(),
        };
        Self { records, total }
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn record(shop: &str, sr_no: Option<u32>, sqft: f64) -> OutputRecord {
        OutputRecord {
            sr_no,
            shop_name: shop.into(),
            count: 1,
            elements: FieldValue::Empty,
            product_name: String::new(),
            width_inch: 0.0,
            height_inch: 0.0,
            width_ft: 0.0,
            height_ft: 0.0,
            quantity: 1.0,
            total_sqft: sqft,
            remark: FieldValue::Empty,
            recce_done_by: " ".into(),
            sales_person: FieldValue::Empty,
            recce_date: FieldValue::Empty,
            location: FieldValue::Empty,
            latitude: FieldValue::Empty,
            longitude: FieldValue::Empty,
            address: FieldValue::Empty,
            pincode: FieldValue::Empty,
            contact_number: FieldValue::Empty,
            contact_person: FieldValue::Empty,
        }
    }

    #[test]
    fn test_format_number() {
        assert_eq!(format_number(560001.0), "560001");
        assert_eq!(format_number(-3.0), "-3");
        assert_eq!(format_number(12.5), "12.5");
        assert_eq!(format_number(0.1), "0.1");
    }

    #[test]
    fn test_field_value_emptiness() {
        assert!(FieldValue::Empty.is_empty());
        assert!(FieldValue::Text(String::new()).is_empty());
        assert!(!FieldValue::Text(" ".into()).is_empty());
        assert!(!FieldValue::Number(0.0).is_empty());
    }

    #[test]
    fn test_input_record_missing_field() {
        let rec = InputRecord::new().with("storeTitle", "acme");
        assert_eq!(rec.text("storeTitle"), "acme");
        assert_eq!(rec.get("Quantity"), &FieldValue::Empty);
        assert_eq!(rec.text("Quantity"), "");
    }

    #[test]
    fn test_cells_follow_column_order() {
        let rec = record("Acme", Some(1), 12.0);
        let cells = rec.cells();
        assert_eq!(cells.len(), OUTPUT_COLUMNS.len());
        assert_eq!(cells[SR_NO_COLUMN], FieldValue::Number(1.0));
        assert_eq!(cells[1], FieldValue::Text("Acme".into()));
        assert_eq!(cells[TOTAL_SQFT_COLUMN], FieldValue::Number(12.0));
        assert_eq!(OUTPUT_COLUMNS[TOTAL_SQFT_COLUMN], "Total Sqft");
        assert_eq!(cells[15], FieldValue::Empty);
    }

    #[test]
    fn test_blank_sr_no_cell() {
        let rec = record("Acme", None, 0.0);
        assert_eq!(rec.cells()[SR_NO_COLUMN], FieldValue::Empty);
    }

    #[test]
    fn test_table_totals() {
        let table = OutputTable::new(vec![
            record("A", Some(1), 12.0),
            record("A", None, 1.5),
            record("B", Some(2), 0.25),
        ]);
        assert_eq!(table.total.data_rows, 3);
        assert_eq!(table.total.run_count, 2);
        assert!((table.total.total_sqft - 13.75).abs() < 1e-9);
    }

    #[test]
    fn test_record_serializes_with_column_names() {
        let json = serde_json::to_value(record("Acme", Some(1), 2.0)).unwrap();
        assert_eq!(json["Shop Name"], "Acme");
        assert_eq!(json["Sr No"], 1);
        assert_eq!(json["Total Sqft"], 2.0);
        assert!(json["Remark"].is_null());
    }
}
