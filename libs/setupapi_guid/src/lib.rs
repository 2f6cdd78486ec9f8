// Copyright (c) ScaleFS LLC; used with permission
// Licensed under the MIT License

pub mod guid;
pub use guid::{Guid, ParseGuidError};
