// Copyright (c) ScaleFS LLC; used with permission
// Licensed under the MIT License

use crate::probe_fill::{check_bool, probe_then_fill};
use crate::Result;
use log::debug;
use setupapi_common::wide_string;
use setupapi_guid::Guid;
use windows_sys::{
    core::GUID,
    Win32::Devices::DeviceAndDriverInstallation::{
        SetupDiClassGuidsFromNameExW,
        SetupDiClassNameFromGuidExW,
    },
};

/// Retrieves the setup class GUIDs registered under `class_name` on the local computer (`machine_name` empty) or a remote computer.
///
/// A class name with no registered classes yields an empty list.
pub fn class_guids_from_name(class_name: &str, machine_name: &str) -> Result<Vec<Guid>> {
    let class_name_as_utf16_chars = wide_string::to_wide_null(class_name);
    let machine_name_as_utf16_chars = wide_string::to_optional_wide_null(machine_name);
    let machine_name_as_pcwstr = wide_string::as_optional_pcwstr(&machine_name_as_utf16_chars);

    // see: https://learn.microsoft.com/en-us/windows/win32/api/setupapi/nf-setupapi-setupdiclassguidsfromnameexw
    // NOTE: the required size is a count of GUIDs, not bytes
    let class_guids = probe_then_fill(GUID::from_u128(0), |class_guid_list, class_guid_list_size, required_size| {
        check_bool(unsafe {
            SetupDiClassGuidsFromNameExW(
                class_name_as_utf16_chars.as_ptr(),
                class_guid_list,
                class_guid_list_size,
                required_size,
                machine_name_as_pcwstr,
                std::ptr::null(),
            )
        })
    })?;
    debug!("class name {:?} resolved to {} class guid(s)", class_name, class_guids.len());

    Ok(class_guids.into_iter().map(Guid::from).collect())
}

/// Retrieves the class name registered for a setup class GUID; the inverse of [`class_guids_from_name`].
pub fn class_name_from_guid(class_guid: &Guid, machine_name: &str) -> Result<String> {
    let class_guid = GUID::from(*class_guid);
    let machine_name_as_utf16_chars = wide_string::to_optional_wide_null(machine_name);
    let machine_name_as_pcwstr = wide_string::as_optional_pcwstr(&machine_name_as_utf16_chars);

    // see: https://learn.microsoft.com/en-us/windows/win32/api/setupapi/nf-setupapi-setupdiclassnamefromguidexw
    let class_name_as_utf16_chars = probe_then_fill(0u16, |class_name, class_name_size, required_size| {
        check_bool(unsafe {
            SetupDiClassNameFromGuidExW(
                &class_guid,
                class_name,
                class_name_size,
                required_size,
                machine_name_as_pcwstr,
                std::ptr::null(),
            )
        })
    })?;

    Ok(wide_string::from_wide_null(&class_name_as_utf16_chars)?)
}
