//! Validation rules for new records
//!
//! Every check runs before anything is written to the store.

use regex::Regex;

use crate::errors::{InsituError, Result};
use crate::schemas::ImagePolicy;

fn invalid(reason: impl Into<String>) -> InsituError {
    InsituError::Validation(reason.into())
}

/// Require a non-blank value for a named field
pub fn require_text(field: &str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(invalid(format!("{} is required", field)));
    }
    Ok(())
}

/// Validate the fields of a new delivery
pub fn validate_new_delivery(title: &str, delivery_address: &str) -> Result<()> {
    require_text("title", title)?;
    require_text("delivery_address", delivery_address)
}

/// Validate the fields of a new warehouse request.
///
/// Returns the quantity narrowed to the stored type.
pub fn validate_new_request(title: &str, quantity: i64) -> Result<u32> {
    require_text("title", title)?;
    if quantity <= 0 {
        return Err(invalid(format!("quantity must be positive, got {}", quantity)));
    }
    u32::try_from(quantity).map_err(|_| invalid(format!("quantity {} is too large", quantity)))
}

pub fn validate_new_work_site(name: &str, address: &str) -> Result<()> {
    require_text("name", name)?;
    require_text("address", address)
}

/// Validate a reference image against the configured policy
pub fn validate_image(len: usize, content_type: &str, policy: &ImagePolicy) -> Result<()> {
    if len == 0 {
        return Err(invalid("image is empty"));
    }
    if len > policy.max_bytes {
        return Err(invalid(format!(
            "image is {} bytes, the limit is {} bytes",
            len, policy.max_bytes
        )));
    }
    let content_type = content_type.trim().to_ascii_lowercase();
    if !content_type.starts_with("image/") || !policy.allowed_types.iter().any(|t| *t == content_type) {
        return Err(invalid(format!("unsupported image type: {}", content_type)));
    }
    Ok(())
}

lazy_static::lazy_static! {
    static ref EMAIL_REGEX: Regex = Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").unwrap();
}

/// Shape check only; delivery is the identity provider's concern
pub fn validate_email(email: &str) -> Result<()> {
    if !EMAIL_REGEX.is_match(email.trim()) {
        return Err(invalid(format!("invalid email address: {}", email)));
    }
    Ok(())
}
