// Copyright (c) ScaleFS LLC; used with permission
// Licensed under the MIT License

//! Safe bindings for the Windows Setup API device-class lookup and device enumeration entry points.
//!
//! ```no_run
//! # #[cfg(target_os = "windows")]
//! # fn main() -> setupapi_windows::Result<()> {
//! use setupapi_windows::{class_guids_from_name, ClassDevsFlags, DeviceInfoSet};
//!
//! let processor_class_guids = class_guids_from_name("Processor", "")?;
//! let device_info_set = DeviceInfoSet::get_class_devs_ex(processor_class_guids.first(), "", None, ClassDevsFlags::PRESENT, "")?;
//! for element in &device_info_set {
//!     println!("{}", element?.instance_id()?);
//! }
//! # Ok(())
//! # }
//! # #[cfg(not(target_os = "windows"))]
//! # fn main() {}
//! ```

pub use setupapi_guid::{Guid, ParseGuidError};

#[cfg(target_os = "windows")]
mod enums;
#[cfg(target_os = "windows")]
pub use enums::*;

#[cfg(target_os = "windows")]
mod errors;
#[cfg(target_os = "windows")]
pub use errors::*;

#[cfg(target_os = "windows")]
mod probe_fill;

#[cfg(target_os = "windows")]
mod class_guids;
#[cfg(target_os = "windows")]
pub use class_guids::{class_guids_from_name, class_name_from_guid};

#[cfg(target_os = "windows")]
mod device_info_element;
#[cfg(target_os = "windows")]
pub use device_info_element::DeviceInfoElement;

#[cfg(target_os = "windows")]
mod device_info_set;
#[cfg(target_os = "windows")]
pub use device_info_set::{DeviceInfoIter, DeviceInfoSet};
