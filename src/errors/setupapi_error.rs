// Copyright (c) ScaleFS LLC; used with permission
// Licensed under the MIT License

use setupapi_common::wide_string::WideStringError;
use setupapi_common::win32_utils;
use std::string::FromUtf16Error;
use thiserror::Error;
use windows::Win32::Foundation::ERROR_NO_MORE_ITEMS;

/// A Win32 status code reported by a Setup API call.
///
/// The message text is looked up in the system message table each time the error is displayed, not when the error is created.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Win32Error {
    code: u32,
}

impl Win32Error {
    pub const fn new(code: u32) -> Self {
        Self { code }
    }

    /// Captures the calling thread's last-error value; call this immediately after the failing native call.
    pub fn last_error() -> Self {
        Self::new(win32_utils::get_last_error_as_win32_error().0)
    }

    pub const fn code(&self) -> u32 {
        self.code
    }

    /// Looks up the system message for this code; the lookup can fail independently of the original error.
    pub fn message(&self) -> std::result::Result<String, Win32Error> {
        win32_utils::format_system_message(self.code).map_err(Win32Error::new)
    }
}

impl std::fmt::Display for Win32Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.message() {
            Ok(message) => write!(f, "{} (win32 error {})", message, self.code),
            Err(lookup_error) => write!(f, "win32 error {} (message lookup failed with win32 error {})", self.code, lookup_error.code),
        }
    }
}

impl std::error::Error for Win32Error {}

#[derive(Debug, Error)]
pub enum SetupApiError {
    #[error(transparent)]
    Win32(#[from] Win32Error),
    #[error("setupapi returned a string that is not valid UTF-16: {0}")]
    StringDecoding(#[source] FromUtf16Error),
    #[error("setupapi returned a string without a null terminator")]
    StringTermination,
}

impl SetupApiError {
    pub(crate) fn last_error() -> Self {
        Self::Win32(Win32Error::last_error())
    }

    /// The Win32 status code, if this error came from a native call.
    pub fn code(&self) -> Option<u32> {
        match self {
            Self::Win32(win32_error) => Some(win32_error.code()),
            _ => None,
        }
    }

    /// True when an enumeration index was past the end of the set.
    pub fn is_no_more_items(&self) -> bool {
        self.code() == Some(ERROR_NO_MORE_ITEMS.0)
    }
}

impl From<WideStringError> for SetupApiError {
    fn from(value: WideStringError) -> Self {
        match value {
            WideStringError::Decoding(decoding_error) => Self::StringDecoding(decoding_error),
            WideStringError::MissingTerminator => Self::StringTermination,
        }
    }
}

pub type Result<T> = std::result::Result<T, SetupApiError>;

#[cfg(test)]
mod tests {
    use super::*;
    use windows::Win32::Foundation::{ERROR_FILE_NOT_FOUND, ERROR_INSUFFICIENT_BUFFER};

    #[test]
    fn display_includes_message_and_code() {
        let error = Win32Error::new(ERROR_FILE_NOT_FOUND.0);
        let rendered = error.to_string();
        assert!(rendered.ends_with("(win32 error 2)"), "{rendered}");
        assert!(rendered.len() > "(win32 error 2)".len());
    }

    #[test]
    fn display_reports_failed_lookup_alongside_code() {
        let error = Win32Error::new(0x3FFF_FFFF);
        assert!(error.message().is_err());
        let rendered = error.to_string();
        assert!(rendered.starts_with(&format!("win32 error {}", 0x3FFF_FFFFu32)), "{rendered}");
        assert!(rendered.contains("message lookup failed"), "{rendered}");
    }

    #[test]
    fn rendering_is_stable() {
        let error = Win32Error::new(ERROR_INSUFFICIENT_BUFFER.0);
        assert_eq!(error.to_string(), error.to_string());
    }

    #[test]
    fn classifies_codes() {
        let no_more_items = SetupApiError::from(Win32Error::new(ERROR_NO_MORE_ITEMS.0));
        assert!(no_more_items.is_no_more_items());
        assert_eq!(no_more_items.code(), Some(259));

        let termination = SetupApiError::from(WideStringError::MissingTerminator);
        assert!(matches!(termination, SetupApiError::StringTermination));
        assert_eq!(termination.code(), None);
        assert!(!termination.is_no_more_items());
    }
}
