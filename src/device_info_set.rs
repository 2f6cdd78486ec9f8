// Copyright (c) ScaleFS LLC; used with permission
// Licensed under the MIT License

use crate::device_info_element::{empty_devinfo_data, DeviceInfoElement};
use crate::probe_fill::check_bool;
use crate::{ClassDevsFlags, Result, SetupApiError};
use log::{debug, warn};
use setupapi_common::{wide_string, win32_utils};
use setupapi_guid::Guid;
use std::iter::FusedIterator;
use std::marker::PhantomData;
use windows_sys::{
    core::GUID,
    Win32::Devices::DeviceAndDriverInstallation::{
        HDEVINFO,
        SetupDiCreateDeviceInfoListExW,
        SetupDiDestroyDeviceInfoList,
        SetupDiEnumDeviceInfo,
        SetupDiGetClassDevsExW,
    },
    Win32::Foundation::{HWND, INVALID_HANDLE_VALUE},
};

/// An owned device information set (`HDEVINFO`) for the local computer or a remote computer.
///
/// The set is destroyed when dropped. Elements returned by [`DeviceInfoSet::enum_device_info`] borrow the set, so the set
/// always outlives them. The raw handle is not safe for unsynchronised use from several threads; the type is neither
/// `Send` nor `Sync`.
pub struct DeviceInfoSet {
    handle: HDEVINFO,
    machine_name: String,
    _not_thread_safe: PhantomData<*const ()>,
}

impl DeviceInfoSet {
    /// Creates an empty set, optionally restricted to one setup class (wraps `SetupDiCreateDeviceInfoListExW`).
    pub fn create(class_guid: Option<&Guid>, parent_window: Option<HWND>, machine_name: &str) -> Result<Self> {
        let class_guid = class_guid.map(|some_class_guid| GUID::from(*some_class_guid));
        let machine_name_as_utf16_chars = wide_string::to_optional_wide_null(machine_name);

        // see: https://learn.microsoft.com/en-us/windows/win32/api/setupapi/nf-setupapi-setupdicreatedeviceinfolistexw
        let handle = unsafe {
            SetupDiCreateDeviceInfoListExW(
                as_optional_guid_ptr(&class_guid),
                parent_window.unwrap_or(std::ptr::null_mut()),
                wide_string::as_optional_pcwstr(&machine_name_as_utf16_chars),
                std::ptr::null(),
            )
        };
        if is_invalid_handle(handle) {
            return Err(SetupApiError::last_error());
        }
        debug!("created empty device info set (machine: {:?})", machine_name);

        Ok(Self { handle, machine_name: machine_name.to_string(), _not_thread_safe: PhantomData })
    }

    /// Acquires a new set holding the devices that match the filters (wraps `SetupDiGetClassDevsExW` with no existing set).
    ///
    /// An empty `enumerator` means "not specified" and is passed to the OS as a null pointer; likewise an empty `machine_name`
    /// selects the local computer.
    pub fn get_class_devs_ex(
        class_guid: Option<&Guid>,
        enumerator: &str,
        parent_window: Option<HWND>,
        flags: ClassDevsFlags,
        machine_name: &str,
    ) -> Result<Self> {
        let handle = get_class_devs_ex_raw(class_guid, enumerator, parent_window, flags, None, machine_name)?;
        debug!("acquired device info set for class {} (enumerator: {:?}, flags: {:?}, machine: {:?})", describe_class(class_guid), enumerator, flags, machine_name);

        Ok(Self { handle, machine_name: machine_name.to_string(), _not_thread_safe: PhantomData })
    }

    /// Appends the matching devices to this set (wraps `SetupDiGetClassDevsExW` with this set as the existing set).
    ///
    /// The set's own machine name is used; the OS rejects a machine name that differs from the one the set was opened for.
    pub fn merge_class_devs_ex(
        &mut self,
        class_guid: Option<&Guid>,
        enumerator: &str,
        parent_window: Option<HWND>,
        flags: ClassDevsFlags,
    ) -> Result<()> {
        let handle = get_class_devs_ex_raw(class_guid, enumerator, parent_window, flags, Some(self.handle), &self.machine_name)?;
        debug_assert!(handle as isize == self.handle as isize, "SetupDiGetClassDevsExW returned a different handle when given an existing device info set");
        debug!("merged class {} into device info set (enumerator: {:?}, flags: {:?})", describe_class(class_guid), enumerator, flags);

        Ok(())
    }

    /// The machine name the set was opened for; empty for the local computer.
    pub fn machine_name(&self) -> &str {
        &self.machine_name
    }

    /// The underlying handle; it remains owned by this set.
    pub fn as_raw(&self) -> HDEVINFO {
        self.handle
    }

    /// Retrieves the element at `member_index` (wraps `SetupDiEnumDeviceInfo`).
    ///
    /// An index at or past the end of the set fails with `ERROR_NO_MORE_ITEMS` (see [`SetupApiError::is_no_more_items`]).
    pub fn enum_device_info(&self, member_index: u32) -> Result<DeviceInfoElement<'_>> {
        let mut devinfo_data = empty_devinfo_data();

        // see: https://learn.microsoft.com/en-us/windows/win32/api/setupapi/nf-setupapi-setupdienumdeviceinfo
        check_bool(unsafe { SetupDiEnumDeviceInfo(self.handle, member_index, &mut devinfo_data) })?;

        Ok(DeviceInfoElement::new(self, devinfo_data))
    }

    /// Iterates the set's elements from index 0; iteration ends at `ERROR_NO_MORE_ITEMS`.
    pub fn iter(&self) -> DeviceInfoIter<'_> {
        DeviceInfoIter {
            device_info_set: self,
            next_index: 0,
            finished: false,
        }
    }
}

impl Drop for DeviceInfoSet {
    fn drop(&mut self) {
        let destroy_result = unsafe { SetupDiDestroyDeviceInfoList(self.handle) };
        if destroy_result == 0 {
            warn!("Could not clean up device info set; win32 error: {}", win32_utils::get_last_error_as_win32_error().0);
        }
    }
}

impl std::fmt::Debug for DeviceInfoSet {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DeviceInfoSet")
            .field("handle", &(self.handle as isize))
            .field("machine_name", &self.machine_name)
            .finish()
    }
}

impl<'set> IntoIterator for &'set DeviceInfoSet {
    type Item = Result<DeviceInfoElement<'set>>;
    type IntoIter = DeviceInfoIter<'set>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

//

pub struct DeviceInfoIter<'set> {
    device_info_set: &'set DeviceInfoSet,
    next_index: u32,
    finished: bool,
}

impl<'set> Iterator for DeviceInfoIter<'set> {
    type Item = Result<DeviceInfoElement<'set>>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.finished {
            return None;
        }

        match self.device_info_set.enum_device_info(self.next_index) {
            Ok(element) => {
                match self.next_index.checked_add(1) {
                    Some(next_index) => self.next_index = next_index,
                    None => self.finished = true,
                }
                Some(Ok(element))
            },
            Err(error) if error.is_no_more_items() => {
                // if we are out of items to enumerate, stop now
                self.finished = true;
                None
            },
            Err(error) => {
                self.finished = true;
                Some(Err(error))
            },
        }
    }
}

impl FusedIterator for DeviceInfoIter<'_> {}

//

fn get_class_devs_ex_raw(
    class_guid: Option<&Guid>,
    enumerator: &str,
    parent_window: Option<HWND>,
    flags: ClassDevsFlags,
    existing_device_info_set: Option<HDEVINFO>,
    machine_name: &str,
) -> Result<HDEVINFO> {
    let class_guid = class_guid.map(|some_class_guid| GUID::from(*some_class_guid));
    // NOTE: the utf16 vectors must stay in scope until the native call returns, since we pass raw pointers into them
    let enumerator_as_utf16_chars = wide_string::to_optional_wide_null(enumerator);
    let machine_name_as_utf16_chars = wide_string::to_optional_wide_null(machine_name);

    // see: https://learn.microsoft.com/en-us/windows/win32/api/setupapi/nf-setupapi-setupdigetclassdevsexw
    let handle = unsafe {
        SetupDiGetClassDevsExW(
            as_optional_guid_ptr(&class_guid),
            wide_string::as_optional_pcwstr(&enumerator_as_utf16_chars),
            parent_window.unwrap_or(std::ptr::null_mut()),
            flags.bits(),
            existing_device_info_set.unwrap_or(0 as HDEVINFO),
            wide_string::as_optional_pcwstr(&machine_name_as_utf16_chars),
            std::ptr::null(),
        )
    };
    if is_invalid_handle(handle) {
        return Err(SetupApiError::last_error());
    }

    Ok(handle)
}

fn as_optional_guid_ptr(class_guid: &Option<GUID>) -> *const GUID {
    match class_guid {
        Some(some_class_guid) => some_class_guid as *const GUID,
        None => std::ptr::null(),
    }
}

fn describe_class(class_guid: Option<&Guid>) -> String {
    match class_guid {
        Some(some_class_guid) => some_class_guid.to_string(),
        None => String::from("(any)"),
    }
}

fn is_invalid_handle(handle: HDEVINFO) -> bool {
    handle as isize == INVALID_HANDLE_VALUE as isize
}
