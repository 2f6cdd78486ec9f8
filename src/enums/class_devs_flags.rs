// Copyright (c) ScaleFS LLC; used with permission
// Licensed under the MIT License

use windows_sys::Win32::Devices::DeviceAndDriverInstallation::{
    DIGCF_ALLCLASSES,
    DIGCF_DEFAULT,
    DIGCF_DEVICEINTERFACE,
    DIGCF_PRESENT,
    DIGCF_PROFILE,
};

bitflags::bitflags! {
    /// `DIGCF_*` control flags for [`DeviceInfoSet::get_class_devs_ex`](crate::DeviceInfoSet::get_class_devs_ex).
    ///
    /// Bit values are identical to the native definitions.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct ClassDevsFlags: u32 {
        /// Only the device associated with the system default device interface (requires `DEVICE_INTERFACE`).
        const DEFAULT = DIGCF_DEFAULT as u32;
        /// Only devices that are currently present.
        const PRESENT = DIGCF_PRESENT as u32;
        /// Devices of every installed setup class (or interface class, with `DEVICE_INTERFACE`).
        const ALL_CLASSES = DIGCF_ALLCLASSES as u32;
        /// Only devices that are part of the current hardware profile.
        const PROFILE = DIGCF_PROFILE as u32;
        /// Devices that support device interfaces of the given interface class.
        const DEVICE_INTERFACE = DIGCF_DEVICEINTERFACE as u32;
    }
}

// kept outside bitflags! so each bit has exactly one name in Debug output and iteration
impl ClassDevsFlags {
    /// Legacy name of [`ClassDevsFlags::DEVICE_INTERFACE`] (same bit).
    #[doc(alias = "DIGCF_INTERFACEDEVICE")]
    pub const INTERFACE_DEVICE: Self = Self::DEVICE_INTERFACE;
}
