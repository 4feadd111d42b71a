use calamine::DataType;
use chrono::NaiveDateTime;
use serde_json::Value;

const DATETIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// A single cell as it leaves the spreadsheet reader.
///
/// Values are passed through untouched until a writer asks for text
/// (`to_field`) or JSON (`to_json`).
#[derive(Debug, Clone, PartialEq)]
pub enum CellValue {
    Empty,
    Text(String),
    Int(i64),
    Number(f64),
    Bool(bool),
    DateTime(NaiveDateTime),
}

impl CellValue {
    /// True for empty cells and for text that is only whitespace.
    pub fn is_blank(&self) -> bool {
        match self {
            CellValue::Empty => true,
            CellValue::Text(s) => s.trim().is_empty(),
            _ => false,
        }
    }

    pub fn to_field(&self) -> String {
        match self {
            CellValue::Empty => String::new(),
            CellValue::Text(s) => s.clone(),
            CellValue::Int(i) => i.to_string(),
            CellValue::Number(f) => f.to_string(),
            CellValue::Bool(true) => "TRUE".to_string(),
            CellValue::Bool(false) => "FALSE".to_string(),
            CellValue::DateTime(dt) => dt.format(DATETIME_FORMAT).to_string(),
        }
    }

    pub fn to_json(&self) -> Value {
        match self {
            CellValue::Int(i) => Value::from(*i),
            // NaN and infinities have no JSON number form
            CellValue::Number(f) => serde_json::Number::from_f64(*f)
                .map(Value::Number)
                .unwrap_or_else(|| Value::String(f.to_string())),
            CellValue::Bool(b) => Value::Bool(*b),
            CellValue::Empty => Value::Null,
            _ => Value::String(self.to_field()),
        }
    }
}

impl From<&DataType> for CellValue {
    fn from(cell: &DataType) -> Self {
        match cell {
            DataType::Empty => CellValue::Empty,
            DataType::String(s) | DataType::DateTimeIso(s) | DataType::DurationIso(s) => {
                CellValue::Text(s.clone())
            }
            DataType::Int(i) => CellValue::Int(*i),
            DataType::Float(f) | DataType::Duration(f) => CellValue::Number(*f),
            DataType::Bool(b) => CellValue::Bool(*b),
            DataType::DateTime(serial) => cell
                .as_datetime()
                .map(CellValue::DateTime)
                .unwrap_or(CellValue::Number(*serial)),
            DataType::Error(e) => CellValue::Text(e.to_string()),
        }
    }
}

/// True when at least one cell holds something other than blank text.
pub fn has_non_null_data(cells: &[CellValue]) -> bool {
    cells.iter().any(|cell| !cell.is_blank())
}

#[cfg(test)]
mod tests {
    use super::*;
    use calamine::CellErrorType;
    use chrono::NaiveDate;

    #[test]
    fn blank_detection() {
        assert!(CellValue::Empty.is_blank());
        assert!(CellValue::Text("   \t".into()).is_blank());
        assert!(!CellValue::Text(" x ".into()).is_blank());
        assert!(!CellValue::Int(0).is_blank());
        assert!(!CellValue::Bool(false).is_blank());
    }

    #[test]
    fn row_with_one_value_has_data() {
        let cells = vec![CellValue::Empty, CellValue::Text(" ".into()), CellValue::Number(0.0)];
        assert!(has_non_null_data(&cells));
        assert!(!has_non_null_data(&cells[..2]));
        assert!(!has_non_null_data(&[]));
    }

    #[test]
    fn fields_are_plain_text() {
        assert_eq!(CellValue::Number(30.0).to_field(), "30");
        assert_eq!(CellValue::Number(2.5).to_field(), "2.5");
        assert_eq!(CellValue::Int(-7).to_field(), "-7");
        assert_eq!(CellValue::Bool(true).to_field(), "TRUE");
        assert_eq!(CellValue::Empty.to_field(), "");
        let dt = NaiveDate::from_ymd_opt(2024, 1, 15)
            .unwrap()
            .and_hms_opt(12, 0, 0)
            .unwrap();
        assert_eq!(CellValue::DateTime(dt).to_field(), "2024-01-15 12:00:00");
    }

    #[test]
    fn converts_reader_cells() {
        assert_eq!(
            CellValue::from(&DataType::String("abc".into())),
            CellValue::Text("abc".into())
        );
        assert_eq!(CellValue::from(&DataType::Float(1.5)), CellValue::Number(1.5));
        assert_eq!(CellValue::from(&DataType::Int(3)), CellValue::Int(3));
        assert_eq!(CellValue::from(&DataType::Bool(false)), CellValue::Bool(false));
        assert_eq!(CellValue::from(&DataType::Empty), CellValue::Empty);
        assert_eq!(
            CellValue::from(&DataType::Error(CellErrorType::Div0)),
            CellValue::Text("#DIV/0!".into())
        );
    }

    #[test]
    fn converts_date_serials() {
        let expected = NaiveDate::from_ymd_opt(2024, 1, 15)
            .unwrap()
            .and_hms_opt(12, 0, 0)
            .unwrap();
        assert_eq!(
            CellValue::from(&DataType::DateTime(45306.5)),
            CellValue::DateTime(expected)
        );
    }

    #[test]
    fn json_keeps_scalar_types() {
        assert_eq!(CellValue::Int(4).to_json(), serde_json::json!(4));
        assert_eq!(CellValue::Number(2.5).to_json(), serde_json::json!(2.5));
        assert_eq!(CellValue::Bool(true).to_json(), serde_json::json!(true));
        assert_eq!(CellValue::Text("a".into()).to_json(), serde_json::json!("a"));
        assert_eq!(CellValue::Number(f64::NAN).to_json(), serde_json::json!("NaN"));
    }
}
