//! Input checks applied to user-supplied definition fields.

use crate::FieldError;

/// Longest permitted name field.
pub const MAX_NAME_LENGTH: usize = 64;

/// Longest permitted free-text description.
pub const MAX_DESCRIPTION_LENGTH: usize = 4096;

/// A name is 1-64 ASCII characters, alphanumeric at both ends, with `.`, `_`
/// or `-` allowed in between.
pub fn validate_name_field(value: &str, field: &str) -> Result<(), FieldError> {
    let invalid = || FieldError::InvalidName {
        field: field.to_string(),
        value: value.to_string(),
    };
    let bytes = value.as_bytes();
    let (first, last) = match (bytes.first(), bytes.last()) {
        (Some(first), Some(last)) => (*first, *last),
        _ => return Err(invalid()),
    };
    if bytes.len() > MAX_NAME_LENGTH
        || !first.is_ascii_alphanumeric()
        || !last.is_ascii_alphanumeric()
    {
        return Err(invalid());
    }
    let interior_ok = bytes
        .iter()
        .all(|b| b.is_ascii_alphanumeric() || matches!(b, b'.' | b'_' | b'-'));
    if !interior_ok {
        return Err(invalid());
    }
    Ok(())
}

/// Rejects values longer than `max` characters.
pub fn validate_length(value: &str, field: &str, max: usize) -> Result<(), FieldError> {
    if value.chars().count() > max {
        return Err(FieldError::TooLong {
            field: field.to_string(),
            max,
        });
    }
    Ok(())
}
