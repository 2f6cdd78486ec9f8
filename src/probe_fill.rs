// Copyright (c) ScaleFS LLC; used with permission
// Licensed under the MIT License

use crate::{Result, Win32Error};
use log::trace;
use windows::Win32::Foundation::{ERROR_INSUFFICIENT_BUFFER, ERROR_INVALID_DATA};
use windows_sys::Win32::Foundation::BOOL;

/// Converts a native `BOOL` result into a `Result`, capturing `GetLastError` on failure.
///
/// Call this directly on the native call's return value so nothing else can overwrite the thread's last-error value first.
pub(crate) fn check_bool(native_result: BOOL) -> std::result::Result<(), Win32Error> {
    if native_result == 0 {
        Err(Win32Error::last_error())
    } else {
        Ok(())
    }
}

/// Runs a Setup API call that reports its output size through a `RequiredSize` out-parameter.
///
/// `native_call(buffer, capacity, required_size)` is invoked twice: first with a null buffer and zero capacity to learn
/// the required size (in elements of `T`, not bytes), then with a buffer of exactly that many elements.
///
/// Only `ERROR_INSUFFICIENT_BUFFER` from the first call is ignored; any other first-call failure is returned as-is.
/// The second call's failure is always returned, so a result that grew between the two calls surfaces as an error
/// instead of being truncated.
pub(crate) fn probe_then_fill<T, F>(zeroed_element: T, mut native_call: F) -> Result<Vec<T>>
where
    T: Clone,
    F: FnMut(*mut T, u32, &mut u32) -> std::result::Result<(), Win32Error>,
{
    let mut required_size: u32 = 0;
    match native_call(std::ptr::null_mut(), 0, &mut required_size) {
        Err(probe_error) if probe_error.code() == ERROR_INSUFFICIENT_BUFFER.0 => {
            // this is the expected error (i.e. the error we intentionally induced); continue
        },
        Err(probe_error) => {
            return Err(probe_error.into());
        },
        Ok(()) => {
            if required_size == 0 {
                // nothing to return (e.g. a class name with no registered classes)
                return Ok(Vec::new());
            }
            // we don't expect the operation to succeed with a null buffer unless there is nothing to return
            return Err(Win32Error::new(ERROR_INVALID_DATA.0).into());
        },
    }
    trace!("setupapi probe reported a required size of {} element(s)", required_size);
    //
    if required_size == 0 {
        return Err(Win32Error::new(ERROR_INVALID_DATA.0).into());
    }

    // NOTE: the Vec's heap buffer does not move while the native call below runs; we do not touch the Vec until it returns
    let mut buffer = vec![zeroed_element; required_size as usize];
    let mut filled_size: u32 = 0;
    native_call(buffer.as_mut_ptr(), required_size, &mut filled_size)?;

    if filled_size as usize > buffer.len() {
        return Err(Win32Error::new(ERROR_INSUFFICIENT_BUFFER.0).into());
    }
    if filled_size != 0 {
        buffer.truncate(filled_size as usize);
    }

    Ok(buffer)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::SetupApiError;
    use windows::Win32::Foundation::ERROR_INVALID_PARAMETER;

    // a scripted stand-in for a SetupDi "RequiredSize" entry point
    struct FakeNative {
        contents: Vec<u16>,
        grow_after_probe: bool,
        calls: u32,
    }

    impl FakeNative {
        fn new(contents: &[u16]) -> Self {
            Self { contents: contents.to_vec(), grow_after_probe: false, calls: 0 }
        }

        fn call(&mut self, buffer: *mut u16, capacity: u32, required_size: &mut u32) -> std::result::Result<(), Win32Error> {
            self.calls += 1;
            if self.calls == 2 && self.grow_after_probe {
                self.contents.push(0);
            }

            *required_size = self.contents.len() as u32;
            if (capacity as usize) < self.contents.len() {
                return Err(Win32Error::new(ERROR_INSUFFICIENT_BUFFER.0));
            }
            if !self.contents.is_empty() {
                unsafe { std::ptr::copy_nonoverlapping(self.contents.as_ptr(), buffer, self.contents.len()) };
            }
            Ok(())
        }
    }

    #[test]
    fn fills_buffer_of_reported_size() {
        let mut native = FakeNative::new(&[1, 2, 3, 0]);
        let result = probe_then_fill(0u16, |buffer, capacity, required_size| native.call(buffer, capacity, required_size)).unwrap();
        assert_eq!(result, vec![1, 2, 3, 0]);
        assert_eq!(native.calls, 2);
    }

    #[test]
    fn surfaces_unrelated_probe_error() {
        let mut calls = 0;
        let result = probe_then_fill(0u16, |_, _, _| {
            calls += 1;
            Err(Win32Error::new(ERROR_INVALID_PARAMETER.0))
        });
        assert_eq!(result.unwrap_err().code(), Some(ERROR_INVALID_PARAMETER.0));
        assert_eq!(calls, 1);
    }

    #[test]
    fn surfaces_fill_error_when_output_grows() {
        let mut native = FakeNative::new(&[7, 7, 0]);
        native.grow_after_probe = true;
        let result = probe_then_fill(0u16, |buffer, capacity, required_size| native.call(buffer, capacity, required_size));
        assert_eq!(result.unwrap_err().code(), Some(ERROR_INSUFFICIENT_BUFFER.0));
    }

    #[test]
    fn empty_output_skips_fill_call() {
        let mut native = FakeNative::new(&[]);
        let result = probe_then_fill(0u16, |buffer, capacity, required_size| native.call(buffer, capacity, required_size)).unwrap();
        assert!(result.is_empty());
        assert_eq!(native.calls, 1);
    }

    #[test]
    fn probe_success_with_nonzero_size_is_invalid() {
        let result = probe_then_fill(0u16, |_, _, required_size| {
            *required_size = 4;
            Ok(())
        });
        assert_eq!(result.unwrap_err().code(), Some(ERROR_INVALID_DATA.0));
    }

    #[test]
    fn rejects_confirmed_size_beyond_buffer() {
        let result = probe_then_fill(0u16, |buffer, _, required_size| {
            if buffer.is_null() {
                *required_size = 2;
                return Err(Win32Error::new(ERROR_INSUFFICIENT_BUFFER.0));
            }
            *required_size = 3;
            Ok(())
        });
        assert!(matches!(result, Err(SetupApiError::Win32(error)) if error.code() == ERROR_INSUFFICIENT_BUFFER.0));
    }

    #[test]
    fn shrinks_to_confirmed_size() {
        let result = probe_then_fill(0u32, |buffer, _, required_size| {
            if buffer.is_null() {
                *required_size = 3;
                return Err(Win32Error::new(ERROR_INSUFFICIENT_BUFFER.0));
            }
            unsafe { *buffer = 42 };
            *required_size = 1;
            Ok(())
        }).unwrap();
        assert_eq!(result, vec![42]);
    }

    #[test]
    fn check_bool_maps_success() {
        assert!(check_bool(1).is_ok());
    }
}
