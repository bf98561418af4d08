use crate::domain::model::BoundingBox;
use crate::utils::error::{HarvestError, Result};
use url::Url;

pub const SUPPORTED_FORMATS: &[&str] = &["tif", "nc"];

pub trait Validate {
    fn validate(&self) -> Result<()>;
}

pub fn validate_url(field_name: &str, url_str: &str) -> Result<()> {
    if url_str.is_empty() {
        return Err(HarvestError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: url_str.to_string(),
            reason: "URL cannot be empty".to_string(),
        });
    }

    match Url::parse(url_str) {
        Ok(url) => match url.scheme() {
            "http" | "https" => Ok(()),
            scheme => Err(HarvestError::InvalidConfigValueError {
                field: field_name.to_string(),
                value: url_str.to_string(),
                reason: format!("Unsupported URL scheme: {}", scheme),
            }),
        },
        Err(e) => Err(HarvestError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: url_str.to_string(),
            reason: format!("Invalid URL format: {}", e),
        }),
    }
}

pub fn validate_path(field_name: &str, path: &str) -> Result<()> {
    if path.is_empty() {
        return Err(HarvestError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: path.to_string(),
            reason: "Path cannot be empty".to_string(),
        });
    }

    if path.contains('\0') {
        return Err(HarvestError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: path.to_string(),
            reason: "Path contains null bytes".to_string(),
        });
    }

    Ok(())
}

pub fn validate_positive_number(field_name: &str, value: u64, min_value: u64) -> Result<()> {
    if value < min_value {
        return Err(HarvestError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: value.to_string(),
            reason: format!("Value must be at least {}", min_value),
        });
    }
    Ok(())
}

pub fn validate_non_empty_string(field_name: &str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(HarvestError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: value.to_string(),
            reason: "Value cannot be empty or whitespace-only".to_string(),
        });
    }
    Ok(())
}

pub fn validate_bbox(field_name: &str, bbox: &BoundingBox) -> Result<()> {
    let coords = [bbox.min_x, bbox.min_y, bbox.max_x, bbox.max_y];
    if coords.iter().any(|c| !c.is_finite()) {
        return Err(HarvestError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: bbox.to_query_value(),
            reason: "Coordinates must be finite numbers".to_string(),
        });
    }

    if bbox.min_x >= bbox.max_x || bbox.min_y >= bbox.max_y {
        return Err(HarvestError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: bbox.to_query_value(),
            reason: "Expected min_x,min_y,max_x,max_y with min < max".to_string(),
        });
    }

    Ok(())
}

pub fn validate_format(format: &str) -> Result<()> {
    if SUPPORTED_FORMATS.contains(&format) {
        Ok(())
    } else {
        Err(HarvestError::UnsupportedFormat {
            format: format.to_string(),
        })
    }
}
