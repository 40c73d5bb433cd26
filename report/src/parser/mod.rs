//! CSV reader with encoding and delimiter auto-detection.
//!
//! Turns a recce export into [`InputRecord`]s. Cells are typed per column:
//! a column whose non-empty cells all parse as numbers becomes numeric,
//! anything else stays text, and empty or NA-like cells are absent.

use std::path::Path;

use crate::error::{CsvError, CsvResult};
use crate::models::{FieldValue, InputRecord};

/// Cell contents read as "no value", like a dataframe reader would.
const NA_MARKERS: [&str; 19] = [
    "", "#N/A", "#N/A N/A", "#NA", "-1.#IND", "-1.#QNAN", "-NaN", "-nan", "1.#IND", "1.#QNAN",
    "<NA>", "N/A", "NA", "NULL", "NaN", "None", "n/a", "nan", "null",
];

/// Result of parsing with metadata
#[derive(Debug, Clone)]
pub struct ParseResult {
    /// Parsed records
    pub records: Vec<InputRecord>,
    /// Detected encoding
    pub encoding: String,
    /// Detected delimiter
    pub delimiter: char,
    /// Column headers, de-duplicated
    pub headers: Vec<String>,
}

/// Detect the encoding of raw bytes using chardet
pub fn detect_encoding(bytes: &[u8]) -> String {
    let result = chardet::detect(bytes);
    let charset = result.0;

    match charset.to_lowercase().as_str() {
        "ascii" | "utf-8" | "utf8" | "utf-8-sig" | "" => "utf-8".to_string(),
        "iso-8859-1" | "iso-8859-15" | "latin-1" | "latin1" => "iso-8859-1".to_string(),
        "windows-1252" | "cp1252" => "windows-1252".to_string(),
        _ => charset,
    }
}

/// Decode bytes to string using the specified encoding.
///
/// A leading byte order mark is dropped.
pub fn decode_content(bytes: &[u8], encoding: &str) -> CsvResult<String> {
    let decoded = match encoding.to_lowercase().as_str() {
        "utf-8" | "utf8" | "ascii" => String::from_utf8_lossy(bytes).to_string(),
        "iso-8859-1" | "latin-1" | "latin1" | "windows-1252" | "cp1252" => {
            encoding_rs::WINDOWS_1252.decode(bytes).0.to_string()
        }
        other => match encoding_rs::Encoding::for_label(other.as_bytes()) {
            Some(enc) => {
                let (text, _, had_errors) = enc.decode(bytes);
                if had_errors {
                    return Err(CsvError::EncodingError(format!(
                        "invalid byte sequence for {}",
                        enc.name()
                    )));
                }
                text.to_string()
            }
            None => String::from_utf8_lossy(bytes).to_string(),
        },
    };

    if let Some(rest) = decoded.strip_prefix('\u{feff}') {
        return Ok(rest.to_string());
    }
    Ok(decoded)
}

/// Detect the delimiter by counting occurrences in the first line.
///
/// Falls back to a comma when no candidate appears.
pub fn detect_delimiter(content: &str) -> char {
    let first_line = content.lines().next().unwrap_or("");

    let separators = [',', ';', '\t', '|'];
    let mut best_sep = ',';
    let mut best_count = 0;

    for &sep in &separators {
        let count = first_line.matches(sep).count();
        if count > best_count {
            best_count = count;
            best_sep = sep;
        }
    }

    best_sep
}

/// Parse a CSV file with auto-detection of encoding and delimiter.
pub fn parse_csv_file_auto<P: AsRef<Path>>(path: P) -> CsvResult<ParseResult> {
    let bytes = std::fs::read(path.as_ref())?;
    parse_bytes_auto(&bytes)
}

/// Parse CSV bytes with auto-detection of encoding and delimiter.
pub fn parse_bytes_auto(bytes: &[u8]) -> CsvResult<ParseResult> {
    let encoding = detect_encoding(bytes);
    let content = decode_content(bytes, &encoding)?;
    let delimiter = detect_delimiter(&content);
    parse_str(&content, delimiter, encoding)
}

/// Parse CSV text with an explicit delimiter.
pub fn parse_str(content: &str, delimiter: char, encoding: String) -> CsvResult<ParseResult> {
    if content.trim().is_empty() {
        return Err(CsvError::EmptyFile);
    }

    let mut reader = csv::ReaderBuilder::new()
        .delimiter(delimiter as u8)
        .has_headers(true)
        .flexible(true)
        .from_reader(content.as_bytes());

    let headers = dedup_headers(reader.headers()?.iter().map(|h| h.trim().to_string()));
    if headers.iter().all(|h| h.is_empty()) {
        return Err(CsvError::EmptyFile);
    }

    let mut rows: Vec<Vec<String>> = Vec::new();
    for result in reader.records() {
        let record = result?;
        let row = (0..headers.len())
            .map(|i| record.get(i).unwrap_or("").to_string())
            .collect();
        rows.push(row);
    }

    let numeric: Vec<bool> = (0..headers.len())
        .map(|col| is_numeric_column(rows.iter().map(|row| row[col].as_str())))
        .collect();

    let records = rows
        .into_iter()
        .map(|row| {
            let mut record = InputRecord::new();
            for (col, raw) in row.into_iter().enumerate() {
                record.insert(headers[col].clone(), type_cell(raw, numeric[col]));
            }
            record
        })
        .collect();

    Ok(ParseResult {
        records,
        encoding,
        delimiter,
        headers,
    })
}

/// Repeated header names get a `.1`, `.2`, ... suffix so no column is lost.
fn dedup_headers(raw: impl Iterator<Item = String>) -> Vec<String> {
    let mut seen: Vec<String> = Vec::new();
    for name in raw {
        let mut candidate = name.clone();
        let mut n = 1;
        while seen.contains(&candidate) {
            candidate = format!("{}.{}", name, n);
            n += 1;
        }
        seen.push(candidate);
    }
    seen
}

fn is_na(cell: &str) -> bool {
    NA_MARKERS.contains(&cell.trim())
}

fn parse_number(cell: &str) -> Option<f64> {
    cell.trim().parse::<f64>().ok().filter(|n| n.is_finite())
}

fn is_numeric_column<'a>(mut cells: impl Iterator<Item = &'a str>) -> bool {
    cells.all(|cell| is_na(cell) || parse_number(cell).is_some())
}

fn type_cell(raw: String, numeric: bool) -> FieldValue {
    if is_na(&raw) {
        return FieldValue::Empty;
    }
    if numeric {
        if let Some(n) = parse_number(&raw) {
            return FieldValue::Number(n);
        }
    }
    FieldValue::Text(raw)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(csv: &str) -> ParseResult {
        parse_str(csv, detect_delimiter(csv), "utf-8".into()).unwrap()
    }

    #[test]
    fn test_simple_csv() {
        let result = parse("storeTitle,Quantity\nacme,2\nbeta,3");

        assert_eq!(result.records.len(), 2);
        assert_eq!(result.headers, vec!["storeTitle", "Quantity"]);
        assert_eq!(result.records[0].text("storeTitle"), "acme");
        assert_eq!(result.records[0].get("Quantity"), &FieldValue::Number(2.0));
        assert_eq!(result.records[1].get("Quantity"), &FieldValue::Number(3.0));
    }

    #[test]
    fn test_quoted_values_keep_delimiters() {
        let result = parse("storeAddress,storePincode\n\"12, MG Road\",560001");

        assert_eq!(result.records[0].text("storeAddress"), "12, MG Road");
        assert_eq!(
            result.records[0].get("storePincode"),
            &FieldValue::Number(560001.0)
        );
    }

    #[test]
    fn test_mixed_column_stays_text() {
        let result = parse("storePincode\n560001\npending");

        assert_eq!(
            result.records[0].get("storePincode"),
            &FieldValue::Text("560001".into())
        );
        assert_eq!(
            result.records[1].get("storePincode"),
            &FieldValue::Text("pending".into())
        );
    }

    #[test]
    fn test_na_markers_are_absent() {
        let result = parse("a,b\nNA,1\n,2\nnull,N/A");

        assert_eq!(result.records[0].get("a"), &FieldValue::Empty);
        assert_eq!(result.records[1].get("a"), &FieldValue::Empty);
        assert_eq!(result.records[2].get("a"), &FieldValue::Empty);
        assert_eq!(result.records[2].get("b"), &FieldValue::Empty);
        assert_eq!(result.records[1].get("b"), &FieldValue::Number(2.0));
    }

    #[test]
    fn test_empty_lines_skipped() {
        let result = parse("a,b\n1,2\n\n3,4\n");
        assert_eq!(result.records.len(), 2);
    }

    #[test]
    fn test_delimiter_only_row_is_kept() {
        let result = parse("a,b\n1,2\n,\n3,4");

        assert_eq!(result.records.len(), 3);
        assert_eq!(result.records[1].get("a"), &FieldValue::Empty);
        assert_eq!(result.records[1].get("b"), &FieldValue::Empty);
        assert_eq!(result.records[2].get("a"), &FieldValue::Number(3.0));
    }

    #[test]
    fn test_short_rows_pad_with_absent() {
        let result = parse("a,b,c\n1,2");

        assert_eq!(result.records[0].get("b"), &FieldValue::Number(2.0));
        assert_eq!(result.records[0].get("c"), &FieldValue::Empty);
    }

    #[test]
    fn test_extra_columns_ignored() {
        let result = parse("a,b\n1,2,3,4");
        assert_eq!(result.records[0].len(), 2);
    }

    #[test]
    fn test_duplicate_headers_are_suffixed() {
        let result = parse("name,name,name\nx,y,z");

        assert_eq!(result.headers, vec!["name", "name.1", "name.2"]);
        assert_eq!(result.records[0].text("name.2"), "z");
    }

    #[test]
    fn test_empty_csv_error() {
        let err = parse_str("", ',', "utf-8".into()).unwrap_err();
        assert!(matches!(err, CsvError::EmptyFile));
    }

    #[test]
    fn test_header_only_has_no_records() {
        let result = parse("storeTitle,Quantity\n");
        assert!(result.records.is_empty());
        assert_eq!(result.headers.len(), 2);
    }

    #[test]
    fn test_detect_delimiter() {
        assert_eq!(detect_delimiter("a;b;c\n1;2;3"), ';');
        assert_eq!(detect_delimiter("a,b,c\n1,2,3"), ',');
        assert_eq!(detect_delimiter("a\tb\tc\n1\t2\t3"), '\t');
        assert_eq!(detect_delimiter("a|b|c\n1|2|3"), '|');
        assert_eq!(detect_delimiter("single"), ',');
    }

    #[test]
    fn test_bom_is_stripped() {
        let bytes = b"\xEF\xBB\xBFstoreTitle,Quantity\nacme,1";
        let result = parse_bytes_auto(bytes).unwrap();

        assert_eq!(result.headers[0], "storeTitle");
        assert_eq!(result.records[0].text("storeTitle"), "acme");
    }

    #[test]
    fn test_latin1_decoding() {
        // "Société" in ISO-8859-1
        let bytes: &[u8] = &[0x53, 0x6F, 0x63, 0x69, 0xE9, 0x74, 0xE9];
        let decoded = decode_content(bytes, "iso-8859-1").unwrap();
        assert_eq!(decoded, "Société");
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let err = parse_csv_file_auto("/definitely/not/here.csv").unwrap_err();
        assert!(matches!(err, CsvError::IoError(_)));
    }
}
