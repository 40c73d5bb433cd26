//! Group consecutive report rows into shop runs.
//!
//! A run is a maximal block of consecutive rows with the same Shop Name.
//! Rows are never reordered; equal names separated by another shop form
//! separate runs.
//!
//! ```text
//! Shop Name   Sr No  Count        Contact Number (in -> out)
//! ┌────────┐  ┌───┐  ┌───┐        ┌──────────────────────────┐
//! │ A      │  │ 1 │  │ 1 │        │ ""       -> ""           │
//! │ A      │  │   │  │ 2 │        │ 555-1234 -> 555-1234     │
//! │ B      │  │ 2 │  │ 1 │        │ ""       -> 555-1234     │
//! │ A      │  │ 3 │  │ 1 │        │ ""       -> 555-1234     │
//! └────────┘  └───┘  └───┘        └──────────────────────────┘
//! ```

use crate::models::{FieldValue, OutputRecord};

/// Accumulator carried down the rows.
#[derive(Debug, Default)]
struct RunState {
    last_shop: Option<String>,
    run_index: u32,
    position: u32,
    last_contact_number: FieldValue,
    last_contact_person: FieldValue,
}

impl RunState {
    fn visit(&mut self, record: &mut OutputRecord) {
        fill_down(&mut record.contact_number, &mut self.last_contact_number);
        fill_down(&mut record.contact_person, &mut self.last_contact_person);

        let continues_run = self.last_shop.as_deref() == Some(record.shop_name.as_str());
        if continues_run {
            self.position += 1;
            record.sr_no = None;
        } else {
            self.run_index += 1;
            self.position = 1;
            record.sr_no = Some(self.run_index);
            self.last_shop = Some(record.shop_name.clone());
        }
        record.count = self.position;
    }
}

/// Replace an empty value with the last non-empty one seen.
fn fill_down(value: &mut FieldValue, last: &mut FieldValue) {
    if value.is_empty() {
        *value = last.clone();
    } else {
        *last = value.clone();
    }
}

/// Number shop runs and fill contact columns down, top to bottom.
///
/// - Sr No holds the run index on the first row of each run, blank elsewhere
/// - Count is the 1-based position inside the run
/// - Empty Contact Number / Contact Person take the previous non-empty value
pub fn group_runs(records: Vec<OutputRecord>) -> Vec<OutputRecord> {
    records
        .into_iter()
        .scan(RunState::default(), |state, mut record| {
            state.visit(&mut record);
            Some(record)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::InputRecord;
    use crate::transform::derive::derive_record;

    fn row(shop: &str, number: &str, person: &str) -> OutputRecord {
        let mut rec = InputRecord::new().with("storeTitle", shop);
        if !number.is_empty() {
            rec.insert("Shop Owner Contact Number", number);
        }
        if !person.is_empty() {
            rec.insert("Shop Owner's Name", person);
        }
        derive_record(&rec, 1).unwrap()
    }

    fn shops(names: &[&str]) -> Vec<OutputRecord> {
        names.iter().map(|n| row(n, "", "")).collect()
    }

    #[test]
    fn test_sr_no_and_count_per_run() {
        let out = group_runs(shops(&["A", "A", "B", "B", "B"]));

        let sr: Vec<Option<u32>> = out.iter().map(|r| r.sr_no).collect();
        let count: Vec<u32> = out.iter().map(|r| r.count).collect();
        assert_eq!(sr, vec![Some(1), None, Some(2), None, None]);
        assert_eq!(count, vec![1, 2, 1, 2, 3]);
    }

    #[test]
    fn test_repeated_shop_after_gap_starts_new_run() {
        let out = group_runs(shops(&["A", "B", "A", "A"]));

        let sr: Vec<Option<u32>> = out.iter().map(|r| r.sr_no).collect();
        let count: Vec<u32> = out.iter().map(|r| r.count).collect();
        assert_eq!(sr, vec![Some(1), Some(2), Some(3), None]);
        assert_eq!(count, vec![1, 1, 1, 2]);
    }

    #[test]
    fn test_empty_shop_names_form_a_run() {
        let out = group_runs(shops(&["", "", "A"]));

        assert_eq!(out[0].sr_no, Some(1));
        assert_eq!(out[1].sr_no, None);
        assert_eq!(out[1].count, 2);
        assert_eq!(out[2].sr_no, Some(2));
    }

    #[test]
    fn test_contact_fill_down() {
        let rows = vec![
            row("A", "", ""),
            row("A", "555-1234", "Mr. Rao"),
            row("B", "", ""),
            row("B", "", "Ms. Iyer"),
        ];
        let out = group_runs(rows);

        let numbers: Vec<String> = out.iter().map(|r| r.contact_number.to_text()).collect();
        let people: Vec<String> = out.iter().map(|r| r.contact_person.to_text()).collect();
        assert_eq!(numbers, vec!["", "555-1234", "555-1234", "555-1234"]);
        assert_eq!(people, vec!["", "Mr. Rao", "Mr. Rao", "Ms. Iyer"]);
    }

    #[test]
    fn test_fill_down_keeps_numbers_numeric() {
        let mut first = row("A", "", "");
        first.contact_number = FieldValue::Number(9876543210.0);
        let out = group_runs(vec![first, row("A", "", "")]);

        assert_eq!(out[1].contact_number, FieldValue::Number(9876543210.0));
    }

    #[test]
    fn test_row_count_preserved() {
        assert!(group_runs(Vec::new()).is_empty());
        assert_eq!(group_runs(shops(&["A", "B", "C"])).len(), 3);
    }

    #[test]
    fn test_sr_no_is_consecutive() {
        let out = group_runs(shops(&["A", "B", "B", "C", "A", "A", "D"]));
        let starts: Vec<u32> = out.iter().filter_map(|r| r.sr_no).collect();
        assert_eq!(starts, vec![1, 2, 3, 4, 5]);
    }
}
