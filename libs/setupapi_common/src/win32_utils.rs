// Copyright (c) ScaleFS LLC; used with permission
// Licensed under the MIT License

use windows::Win32::Foundation::{GetLastError, ERROR_INSUFFICIENT_BUFFER, WIN32_ERROR};
use windows_sys::Win32::System::Diagnostics::Debug::{
    FormatMessageW,
    FORMAT_MESSAGE_FROM_SYSTEM,
    FORMAT_MESSAGE_IGNORE_INSERTS,
};

const INITIAL_SYSTEM_MESSAGE_CAPACITY: usize = 512;
// FormatMessageW cannot produce more than 64K bytes of output
const MAX_SYSTEM_MESSAGE_CAPACITY: usize = 32 * 1024;

pub fn get_last_error_as_win32_error() -> WIN32_ERROR {
    unsafe { GetLastError() }
}

/// Looks up the system message-table text for `win32_error`.
///
/// On failure, returns the Win32 error code reported by the lookup itself.
pub fn format_system_message(win32_error: u32) -> Result<String, u32> {
    format_system_message_with_capacity(win32_error, INITIAL_SYSTEM_MESSAGE_CAPACITY)
}

fn format_system_message_with_capacity(win32_error: u32, initial_capacity: usize) -> Result<String, u32> {
    let mut capacity = initial_capacity.max(1);
    loop {
        let mut message_as_utf16_chars = vec![0u16; capacity];

        // see: https://learn.microsoft.com/en-us/windows/win32/api/winbase/nf-winbase-formatmessagew
        let written_char_count = unsafe {
            FormatMessageW(
                FORMAT_MESSAGE_FROM_SYSTEM | FORMAT_MESSAGE_IGNORE_INSERTS,
                std::ptr::null(),
                win32_error,
                0, // language neutral; the system falls back through the user's languages
                message_as_utf16_chars.as_mut_ptr(),
                message_as_utf16_chars.len() as u32,
                std::ptr::null(),
            )
        };
        if written_char_count == 0 {
            let lookup_error = get_last_error_as_win32_error();
            if lookup_error == ERROR_INSUFFICIENT_BUFFER && capacity < MAX_SYSTEM_MESSAGE_CAPACITY {
                // the message exists but does not fit; retry with a larger buffer
                capacity = (capacity * 2).min(MAX_SYSTEM_MESSAGE_CAPACITY);
                continue;
            }
            return Err(lookup_error.0);
        }

        // system messages end with "\r\n"
        let message = String::from_utf16_lossy(&message_as_utf16_chars[..written_char_count as usize]);
        return Ok(message.trim_end().to_string());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn formats_a_well_known_code() {
        // ERROR_FILE_NOT_FOUND
        let message = format_system_message(2).unwrap();
        assert!(!message.is_empty());
        assert!(!message.ends_with('\n'));
    }

    #[test]
    fn reports_lookup_failure_for_unknown_code() {
        // no message-table entry exists for this code
        let lookup_error = format_system_message(0x3FFF_FFFF).unwrap_err();
        assert_ne!(lookup_error, 0);
    }

    #[test]
    fn grows_buffer_for_messages_longer_than_capacity() {
        let expected = format_system_message(2).unwrap();
        assert!(expected.encode_utf16().count() > 4);

        let grown = format_system_message_with_capacity(2, 4).unwrap();
        assert_eq!(grown, expected);
    }
}
