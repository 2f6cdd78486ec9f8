// Copyright (c) ScaleFS LLC; used with permission
// Licensed under the MIT License

mod setupapi_error;
pub use setupapi_error::{Result, SetupApiError, Win32Error};
