// Copyright (c) ScaleFS LLC; used with permission
// Licensed under the MIT License

use crate::probe_fill::{check_bool, probe_then_fill};
use crate::{DeviceInfoSet, Result};
use setupapi_common::wide_string;
use setupapi_guid::Guid;
use windows_sys::{
    core::GUID,
    Win32::Devices::DeviceAndDriverInstallation::{
        SP_DEVINFO_DATA,
        SetupDiGetDeviceInstanceIdW,
    },
};

/// An `SP_DEVINFO_DATA` ready to be filled by the OS.
///
/// `cbSize` must hold the exact structure size before every call that fills the record; the OS uses it to check the structure version.
pub(crate) fn empty_devinfo_data() -> SP_DEVINFO_DATA {
    SP_DEVINFO_DATA {
        cbSize: std::mem::size_of::<SP_DEVINFO_DATA>() as u32,
        ClassGuid: GUID::from_u128(0),
        DevInst: 0,
        Reserved: 0,
    }
}

/// One member of a [`DeviceInfoSet`].
///
/// The element borrows the set that produced it; per-element queries run against that set.
pub struct DeviceInfoElement<'set> {
    device_info_set: &'set DeviceInfoSet,
    devinfo_data: SP_DEVINFO_DATA,
}

impl<'set> DeviceInfoElement<'set> {
    pub(crate) fn new(device_info_set: &'set DeviceInfoSet, devinfo_data: SP_DEVINFO_DATA) -> Self {
        Self { device_info_set, devinfo_data }
    }

    pub fn class_guid(&self) -> Guid {
        Guid::from(self.devinfo_data.ClassGuid)
    }

    /// The devnode handle (`DEVINST`) usable with the configuration manager `CM_*` functions.
    pub fn dev_inst(&self) -> u32 {
        self.devinfo_data.DevInst
    }

    /// The `cbSize` of the underlying record.
    pub fn record_size(&self) -> u32 {
        self.devinfo_data.cbSize
    }

    pub fn device_info_set(&self) -> &'set DeviceInfoSet {
        self.device_info_set
    }

    pub fn as_raw(&self) -> &SP_DEVINFO_DATA {
        &self.devinfo_data
    }

    /// Retrieves the device instance ID (e.g. `ACPI\GENUINEINTEL_-_INTEL64\_0`) of this element.
    pub fn instance_id(&self) -> Result<String> {
        // get the size of the device instance id, null-terminated, as a count of utf-16 characters; then fetch it into a buffer of that size
        // see: https://learn.microsoft.com/en-us/windows/win32/api/setupapi/nf-setupapi-setupdigetdeviceinstanceidw
        let device_instance_id_as_utf16_chars = probe_then_fill(0u16, |device_instance_id, device_instance_id_size, required_size| {
            check_bool(unsafe {
                SetupDiGetDeviceInstanceIdW(
                    self.device_info_set.as_raw(),
                    &self.devinfo_data,
                    device_instance_id,
                    device_instance_id_size,
                    required_size,
                )
            })
        })?;

        Ok(wide_string::from_wide_null(&device_instance_id_as_utf16_chars)?)
    }
}

impl std::fmt::Debug for DeviceInfoElement<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DeviceInfoElement")
            .field("class_guid", &self.class_guid())
            .field("dev_inst", &self.dev_inst())
            .field("device_info_set", &self.device_info_set)
            .finish()
    }
}
