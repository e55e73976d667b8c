//! Nullable scalar values held in a result row.

use std::fmt;

use serde::Serialize;

/// One table cell. `Null` renders as an empty string in CSV and table output.
#[derive(Debug, Clone, PartialEq, Serialize, Default)]
#[serde(untagged)]
pub enum Cell {
    #[default]
    Null,
    Integer(i64),
    Number(f64),
    Text(String),
    Bool(bool),
}

impl Cell {
    pub fn is_null(&self) -> bool {
        matches!(self, Cell::Null)
    }

    /// Convert a provider JSON scalar. Objects and arrays are not cell values.
    pub fn from_json(value: &serde_json::Value) -> Self {
        match value {
            serde_json::Value::Bool(b) => Cell::Bool(*b),
            serde_json::Value::Number(n) => match n.as_i64() {
                Some(i) => Cell::Integer(i),
                None => n.as_f64().map(Cell::Number).unwrap_or(Cell::Null),
            },
            serde_json::Value::String(s) if !s.is_empty() => Cell::Text(s.clone()),
            _ => Cell::Null,
        }
    }
}

impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Cell::Null => Ok(()),
            Cell::Integer(v) => write!(f, "{}", v),
            Cell::Number(v) => write!(f, "{}", v),
            Cell::Text(s) => f.write_str(s),
            Cell::Bool(b) => f.write_str(if *b { "True" } else { "False" }),
        }
    }
}

impl From<Option<f64>> for Cell {
    fn from(value: Option<f64>) -> Self {
        value.map(Cell::Number).unwrap_or(Cell::Null)
    }
}

impl From<Option<String>> for Cell {
    fn from(value: Option<String>) -> Self {
        value.map(Cell::Text).unwrap_or(Cell::Null)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn from_json_scalars() {
        assert_eq!(Cell::from_json(&json!(3000000000_i64)), Cell::Integer(3_000_000_000));
        assert_eq!(Cell::from_json(&json!(0.25)), Cell::Number(0.25));
        assert_eq!(Cell::from_json(&json!(true)), Cell::Bool(true));
        assert_eq!(Cell::from_json(&json!("x")), Cell::Text("x".to_string()));
    }

    #[test]
    fn from_json_non_scalars_are_null() {
        assert!(Cell::from_json(&json!(null)).is_null());
        assert!(Cell::from_json(&json!({})).is_null());
        assert!(Cell::from_json(&json!([1, 2])).is_null());
        assert!(Cell::from_json(&json!("")).is_null());
    }

    #[test]
    fn display_null_is_empty() {
        assert_eq!(Cell::Null.to_string(), "");
        assert_eq!(Cell::Bool(false).to_string(), "False");
        assert_eq!(Cell::Number(1.5).to_string(), "1.5");
    }
}
