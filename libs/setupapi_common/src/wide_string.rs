// Copyright (c) ScaleFS LLC; used with permission
// Licensed under the MIT License

use std::string::FromUtf16Error;

#[derive(Debug)]
pub enum WideStringError {
    Decoding(/*error: */FromUtf16Error),
    MissingTerminator,
}

/// Encodes `value` as a null-terminated UTF-16 string.
pub fn to_wide_null(value: &str) -> Vec<u16> {
    value.encode_utf16().chain(Some(0)).collect()
}

/// Encodes `value` as a null-terminated UTF-16 string, or `None` when `value` is empty.
///
/// Setup API entry points treat a null string pointer ("not specified") differently from a pointer to an empty string.
pub fn to_optional_wide_null(value: &str) -> Option<Vec<u16>> {
    if value.is_empty() {
        None
    } else {
        Some(to_wide_null(value))
    }
}

/// Returns a pointer suitable for a `PCWSTR` parameter; null when `value` is `None`.
///
/// NOTE: the returned pointer borrows `value`'s heap buffer; keep `value` alive (and unmodified) until the native call returns
pub fn as_optional_pcwstr(value: &Option<Vec<u16>>) -> *const u16 {
    match value {
        Some(chars) => chars.as_ptr(),
        None => std::ptr::null(),
    }
}

/// Decodes a null-terminated UTF-16 buffer filled by a native call (the terminator and anything after it are dropped).
pub fn from_wide_null(chars: &[u16]) -> Result<String, WideStringError> {
    let terminator_index = chars.iter().position(|ch| *ch == 0).ok_or(WideStringError::MissingTerminator)?;
    String::from_utf16(&chars[..terminator_index]).map_err(WideStringError::Decoding)
}
