use std::path::Path;

use super::record::CalibratedParameters;
use super::{read_text, ExtractError};

/// Read the final calibrated values from a results file
pub fn read_calibrated_params<P: AsRef<Path>>(path: P) -> Result<CalibratedParameters, ExtractError> {
    let text = read_text(path.as_ref())?;
    parse_calibrated_params(&text)
}

/// Parse `name value` rows after a single header line.
///
/// Rows with fewer than two whitespace-separated tokens are skipped; extra
/// columns are ignored.
pub fn parse_calibrated_params(text: &str) -> Result<CalibratedParameters, ExtractError> {
    let mut params = CalibratedParameters::new();

    for (index, line) in text.lines().enumerate().skip(1) {
        let mut tokens = line.split_whitespace();
        let (Some(name), Some(raw)) = (tokens.next(), tokens.next()) else {
            continue;
        };

        let value = raw.parse::<f64>().map_err(|_| ExtractError::InvalidValue {
            line: index + 1,
            value: raw.to_string(),
        })?;
        params.insert(name.to_string(), value);
    }

    Ok(params)
}
