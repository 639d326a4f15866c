use crate::{
    DriveError, DriveName, DriveSet, DriveSnapshot, DriveType, Drives, FreeSpace, HostError,
    VolumeHost, VolumeInformation,
};
use std::collections::HashMap;
use windows::core::PCWSTR;
use windows::Win32::Foundation::GetLastError;
use windows::Win32::Storage::FileSystem::{
    GetDiskFreeSpaceExW, GetDriveTypeW, GetLogicalDrives, GetVolumeInformationW, SetVolumeLabelW,
};
use wmi::{COMLibrary, Variant, WMIConnection};

/// Buffer length for labels and file system names (MAX_PATH + 1).
const NAME_BUFFER_LEN: usize = 261;

/// Facility code carried by HRESULTs that wrap a Win32 error.
const FACILITY_WIN32_MASK: u32 = 0xFFFF_0000;
const FACILITY_WIN32_PREFIX: u32 = 0x8007_0000;

const LOGICAL_DISK_QUERY: &str =
    "SELECT DeviceID, DriveType, FileSystem, FreeSpace, Size, VolumeName FROM Win32_LogicalDisk";

/// A [`VolumeHost`] backed by the Win32 volume management functions.
#[derive(Debug, Default, Clone, Copy)]
pub struct WindowsHost;

impl WindowsHost {
    pub fn new() -> Self {
        WindowsHost
    }
}

impl Drives<WindowsHost> {
    /// Returns a facade over the drives of this machine.
    pub fn system() -> Self {
        Drives::new(WindowsHost)
    }
}

/// Snapshots every drive present on this machine.
pub fn get_drives() -> Result<Vec<DriveSnapshot>, DriveError> {
    Drives::system().snapshots()
}

/// Encodes a string as a NUL-terminated UTF-16 buffer.
fn to_wide(s: &str) -> Vec<u16> {
    s.encode_utf16().chain(std::iter::once(0)).collect()
}

/// Decodes a UTF-16 buffer up to its first NUL.
fn from_wide(buffer: &[u16]) -> String {
    let len = buffer.iter().position(|&c| c == 0).unwrap_or(buffer.len());
    String::from_utf16_lossy(&buffer[..len])
}

/// Extracts the Win32 error code from a `windows` error.
pub(super) fn win32_code(err: &windows::core::Error) -> u32 {
    let hresult = err.code().0 as u32;
    if hresult & FACILITY_WIN32_MASK == FACILITY_WIN32_PREFIX {
        hresult & !FACILITY_WIN32_MASK
    } else {
        hresult
    }
}

fn host_error(err: windows::core::Error) -> HostError {
    HostError::from_win32(win32_code(&err))
}

impl VolumeHost for WindowsHost {
    fn present_drives(&self) -> Result<DriveSet, HostError> {
        let mask = unsafe { GetLogicalDrives() };
        if mask == 0 {
            let code = unsafe { GetLastError() }.0;
            // A zero mask with no error is a machine without drives.
            if code != 0 {
                tracing::warn!(code, "GetLogicalDrives failed");
                return Err(HostError::from_win32(code));
            }
        }
        Ok(DriveSet::from_bitmask(mask))
    }

    fn drive_type(&self, drive: &DriveName) -> DriveType {
        let root = to_wide(drive.root());
        let code = unsafe { GetDriveTypeW(PCWSTR(root.as_ptr())) };
        DriveType::from(code)
    }

    fn volume_information(&self, drive: &DriveName) -> Result<VolumeInformation, HostError> {
        let root = to_wide(drive.root());
        let mut label = [0u16; NAME_BUFFER_LEN];
        let mut file_system = [0u16; NAME_BUFFER_LEN];
        let mut serial_number = 0u32;
        let mut max_component_length = 0u32;
        let mut flags = 0u32;

        unsafe {
            GetVolumeInformationW(
                PCWSTR(root.as_ptr()),
                Some(&mut label),
                Some(&mut serial_number as *mut u32),
                Some(&mut max_component_length as *mut u32),
                Some(&mut flags as *mut u32),
                Some(&mut file_system),
            )
        }
        .map_err(host_error)?;

        Ok(VolumeInformation {
            label: from_wide(&label),
            file_system: from_wide(&file_system),
            serial_number,
            max_component_length,
            flags,
        })
    }

    fn free_space(&self, drive: &DriveName) -> Result<FreeSpace, HostError> {
        let root = to_wide(drive.root());
        let mut space = FreeSpace::default();

        unsafe {
            GetDiskFreeSpaceExW(
                PCWSTR(root.as_ptr()),
                Some(&mut space.available_to_caller as *mut u64),
                Some(&mut space.total_bytes as *mut u64),
                Some(&mut space.total_free as *mut u64),
            )
        }
        .map_err(host_error)?;

        Ok(space)
    }

    fn set_volume_label(&self, drive: &DriveName, label: &str) -> Result<(), HostError> {
        let root = to_wide(drive.root());
        let label_wide = to_wide(label);
        // A NULL label deletes the current one.
        let label_ptr = if label.is_empty() {
            PCWSTR::null()
        } else {
            PCWSTR(label_wide.as_ptr())
        };

        unsafe { SetVolumeLabelW(PCWSTR(root.as_ptr()), label_ptr) }.map_err(host_error)
    }
}

/// A logical disk as reported by WMI's `Win32_LogicalDisk` class.
#[derive(Debug, Clone, PartialEq)]
pub struct LogicalDisk {
    pub name: DriveName,
    pub drive_type: DriveType,
    pub file_system: Option<String>,
    pub volume_name: Option<String>,
    pub size: Option<u64>,
    pub free_space: Option<u64>,
}

/// Lists logical disks through WMI.
///
/// This goes through a different OS path than [`WindowsHost`] and is useful
/// to cross-check its answers.
pub fn query_logical_disks() -> Result<Vec<LogicalDisk>, DriveError> {
    let com_con = COMLibrary::new()?;
    let wmi_con = WMIConnection::new(com_con)?;

    let results: Vec<HashMap<String, Variant>> = wmi_con.raw_query(LOGICAL_DISK_QUERY)?;

    Ok(results.iter().filter_map(process_logical_disk).collect())
}

/// Process a single `Win32_LogicalDisk` row
fn process_logical_disk(disk: &HashMap<String, Variant>) -> Option<LogicalDisk> {
    // DeviceID is the bare "C:" form.
    let name = DriveName::parse(&get_string_value(disk, "DeviceID")?).ok()?;
    let drive_type = get_u32_value(disk, "DriveType")
        .map(DriveType::from)
        .unwrap_or_default();

    Some(LogicalDisk {
        name,
        drive_type,
        file_system: get_string_value(disk, "FileSystem"),
        volume_name: get_string_value(disk, "VolumeName"),
        size: get_u64_value(disk, "Size"),
        free_space: get_u64_value(disk, "FreeSpace"),
    })
}

// Helper functions
pub(super) fn get_string_value(map: &HashMap<String, Variant>, key: &str) -> Option<String> {
    match map.get(key) {
        Some(Variant::String(value)) => Some(value.clone()),
        _ => None,
    }
}

pub(super) fn get_u32_value(map: &HashMap<String, Variant>, key: &str) -> Option<u32> {
    match map.get(key) {
        Some(Variant::UI4(value)) => Some(*value),
        _ => None,
    }
}

/// WMI hands uint64 properties over either as numbers or as strings.
pub(super) fn get_u64_value(map: &HashMap<String, Variant>, key: &str) -> Option<u64> {
    match map.get(key) {
        Some(Variant::UI8(value)) => Some(*value),
        Some(Variant::String(value)) => value.parse().ok(),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_win32_code() {
        let not_ready = windows::core::Error::from_hresult(windows::core::HRESULT(
            0x8007_0015_u32 as i32,
        ));
        assert_eq!(win32_code(&not_ready), 21);
        assert_eq!(host_error(not_ready), HostError::NotReady);

        let other = windows::core::Error::from_hresult(windows::core::HRESULT(
            0x8000_4005_u32 as i32,
        ));
        assert_eq!(win32_code(&other), 0x8000_4005);
    }

    #[test]
    fn test_wide_round_trip() {
        let wide = to_wide("C:\\");
        assert_eq!(wide.last(), Some(&0));
        assert_eq!(from_wide(&wide), "C:\\");
        assert_eq!(from_wide(&[0x4E, 0x54, 0x46, 0x53]), "NTFS");
    }

    #[test]
    fn test_get_string_value() {
        let mut map = HashMap::new();
        map.insert("key1".to_string(), Variant::String("value1".to_string()));
        map.insert("key2".to_string(), Variant::UI4(42));

        assert_eq!(get_string_value(&map, "key1"), Some("value1".to_string()));
        assert_eq!(get_string_value(&map, "key2"), None);
        assert_eq!(get_string_value(&map, "key3"), None);
    }

    #[test]
    fn test_get_u32_value() {
        let mut map = HashMap::new();
        map.insert("key1".to_string(), Variant::UI4(3));
        map.insert("key2".to_string(), Variant::String("3".to_string()));

        assert_eq!(get_u32_value(&map, "key1"), Some(3));
        assert_eq!(get_u32_value(&map, "key2"), None);
        assert_eq!(get_u32_value(&map, "key3"), None);
    }

    #[test]
    fn test_get_u64_value() {
        let mut map = HashMap::new();
        map.insert("key1".to_string(), Variant::UI8(1234567890));
        map.insert("key2".to_string(), Variant::String("987654321".to_string()));
        map.insert(
            "key3".to_string(),
            Variant::String("not_a_number".to_string()),
        );

        assert_eq!(get_u64_value(&map, "key1"), Some(1234567890));
        assert_eq!(get_u64_value(&map, "key2"), Some(987654321));
        assert_eq!(get_u64_value(&map, "key3"), None);
        assert_eq!(get_u64_value(&map, "key4"), None);
    }

    #[test]
    fn test_process_logical_disk() {
        let mut row = HashMap::new();
        row.insert("DeviceID".to_string(), Variant::String("C:".to_string()));
        row.insert("DriveType".to_string(), Variant::UI4(3));
        row.insert("FileSystem".to_string(), Variant::String("NTFS".to_string()));
        row.insert("Size".to_string(), Variant::UI8(1000));

        let disk = process_logical_disk(&row).unwrap();
        assert_eq!(disk.name.root(), "C:\\");
        assert_eq!(disk.drive_type, DriveType::Fixed);
        assert_eq!(disk.file_system.as_deref(), Some("NTFS"));
        assert_eq!(disk.volume_name, None);
        assert_eq!(disk.size, Some(1000));

        row.insert("DeviceID".to_string(), Variant::String("\\\\server".to_string()));
        assert_eq!(process_logical_disk(&row), None);
    }
}
