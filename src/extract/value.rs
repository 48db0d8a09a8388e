use serde::{Deserialize, Serialize};
use std::fmt;

/// A scalar read from a calibration log.
///
/// Log values are plain text; they are coerced to the narrowest type that
/// parses, trying an integer first, then a float, and falling back to the
/// raw string.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ParamValue {
    /// Whole number without a decimal point or exponent
    Int(i64),
    /// Any other numeric literal
    Float(f64),
    /// Text that is not numeric
    Text(String),
}

impl ParamValue {
    /// Coerce a raw token from the log
    pub fn parse(raw: &str) -> Self {
        if let Ok(value) = raw.parse::<i64>() {
            return ParamValue::Int(value);
        }
        if let Ok(value) = raw.parse::<f64>() {
            return ParamValue::Float(value);
        }
        ParamValue::Text(raw.to_string())
    }

    /// Numeric view of the value, if it has one
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            ParamValue::Int(v) => Some(*v as f64),
            ParamValue::Float(v) => Some(*v),
            ParamValue::Text(_) => None,
        }
    }

    /// Whether the value was kept as text
    pub fn is_text(&self) -> bool {
        matches!(self, ParamValue::Text(_))
    }
}

impl Default for ParamValue {
    fn default() -> Self {
        ParamValue::Int(0)
    }
}

impl fmt::Display for ParamValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParamValue::Int(v) => write!(f, "{}", v),
            ParamValue::Float(v) => write!(f, "{}", v),
            ParamValue::Text(v) => f.write_str(v),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_prefers_integer() {
        assert_eq!(ParamValue::parse("4"), ParamValue::Int(4));
        assert_eq!(ParamValue::parse("-12"), ParamValue::Int(-12));
    }

    #[test]
    fn test_parse_float_forms() {
        assert_eq!(ParamValue::parse("2.5"), ParamValue::Float(2.5));
        assert_eq!(ParamValue::parse("1e3"), ParamValue::Float(1000.0));
        assert_eq!(ParamValue::parse("7.0e-4"), ParamValue::Float(7.0e-4));
    }

    #[test]
    fn test_parse_falls_back_to_text() {
        assert_eq!(ParamValue::parse("1e"), ParamValue::Text("1e".to_string()));
        assert!(ParamValue::parse("hooke").is_text());
    }

    #[test]
    fn test_untagged_json() {
        let json = serde_json::to_string(&vec![
            ParamValue::Int(1),
            ParamValue::Float(0.5),
            ParamValue::Text("x".to_string()),
        ])
        .unwrap();
        assert_eq!(json, r#"[1,0.5,"x"]"#);

        let restored: Vec<ParamValue> = serde_json::from_str(&json).unwrap();
        assert_eq!(restored[0], ParamValue::Int(1));
        assert_eq!(restored[1], ParamValue::Float(0.5));
    }
}
