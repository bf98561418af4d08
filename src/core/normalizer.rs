use crate::domain::model::{DownloadRequest, NormalizedRequest, YearInput};
use crate::utils::error::{HarvestError, Result};

/// Coerces raw year values to integers, keeping their order.
///
/// Integers, whole floats (`2020.0`) and text holding either are accepted.
/// Fractional, non-finite, non-numeric and out-of-range values are rejected.
pub fn normalize_years(years: &[YearInput]) -> Result<Vec<i32>> {
    years.iter().map(coerce_year).collect()
}

pub fn normalize(request: &DownloadRequest) -> Result<NormalizedRequest> {
    let years = normalize_years(&request.years)?;

    Ok(NormalizedRequest {
        layers: request.layers.as_slice().to_vec(),
        years,
        bbox: request.bbox,
        out_path: request.out_path.clone(),
        format: request.format.clone(),
        delete_temp: request.delete_temp,
    })
}

fn coerce_year(input: &YearInput) -> Result<i32> {
    match input {
        YearInput::Int(v) => int_to_year(*v, input),
        YearInput::Float(v) => float_to_year(*v, input),
        YearInput::Text(s) => {
            let trimmed = s.trim();
            if let Ok(v) = trimmed.parse::<i64>() {
                int_to_year(v, input)
            } else if let Ok(v) = trimmed.parse::<f64>() {
                float_to_year(v, input)
            } else {
                Err(invalid(input, "not a number"))
            }
        }
    }
}

fn int_to_year(value: i64, input: &YearInput) -> Result<i32> {
    i32::try_from(value).map_err(|_| invalid(input, "out of integer range"))
}

fn float_to_year(value: f64, input: &YearInput) -> Result<i32> {
    if !value.is_finite() {
        return Err(invalid(input, "not a finite number"));
    }
    if value.fract() != 0.0 {
        return Err(invalid(input, "not a whole year"));
    }
    if value < i32::MIN as f64 || value > i32::MAX as f64 {
        return Err(invalid(input, "out of integer range"));
    }
    Ok(value as i32)
}

fn invalid(input: &YearInput, reason: &str) -> HarvestError {
    HarvestError::InvalidYear {
        value: input.to_string(),
        reason: reason.to_string(),
    }
}
