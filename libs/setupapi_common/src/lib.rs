// Copyright (c) ScaleFS LLC; used with permission
// Licensed under the MIT License

#[cfg(target_os = "windows")]
pub mod win32_utils;

pub mod wide_string;
