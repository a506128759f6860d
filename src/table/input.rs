use crate::propagator::SimulationRequest;

use super::error::TableError;

const FIELDS: [&str; 3] = ["altitude", "velocity", "duration"];

/// Parses the three-scalar input protocol: altitude (km), initial speed
/// (m/s, `0` for auto) and duration (s), separated by any whitespace.
pub fn parse_request(text: &str) -> Result<SimulationRequest, TableError> {
    let mut tokens = text.split_whitespace();
    let mut values = [0.0; 3];

    for (slot, field) in values.iter_mut().zip(FIELDS) {
        let token = tokens.next().ok_or(TableError::MissingValue(field))?;
        *slot = parse_number(field, token)?;
    }

    if let Some(extra) = tokens.next() {
        return Err(TableError::ExtraValue(extra.to_string()));
    }

    Ok(SimulationRequest::new(values[0], values[1], values[2]))
}

pub(crate) fn parse_number(field: &'static str, token: &str) -> Result<f64, TableError> {
    token
        .parse::<f64>()
        .map_err(|_| TableError::InvalidNumber {
            field,
            value: token.to_string(),
        })
}
