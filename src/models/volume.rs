//! This module provides the raw records a host returns for a volume.
//!
//! They mirror what the operating system reports for a drive root: the
//! volume information block and the free space triple. The facade picks the
//! fields callers ask for out of these records.

/// Volume information for a drive root.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serialize", derive(serde::Serialize))]
pub struct VolumeInformation {
    /// Volume label, possibly empty
    pub label: String,
    /// File system name (e.g., "NTFS", "FAT32")
    pub file_system: String,
    /// Serial number assigned when the volume was formatted
    pub serial_number: u32,
    /// Maximum length of a single path component
    pub max_component_length: u32,
    /// File system flags bitmask
    pub flags: u32,
}

impl VolumeInformation {
    /// Creates volume information with the given label and file system name.
    ///
    /// # Examples
    ///
    /// ```
    /// use win_drive_info::VolumeInformation;
    ///
    /// let info = VolumeInformation::new("System", "NTFS");
    /// assert_eq!(info.max_component_length, 255);
    /// ```
    pub fn new(label: impl Into<String>, file_system: impl Into<String>) -> Self {
        VolumeInformation {
            label: label.into(),
            file_system: file_system.into(),
            serial_number: 0,
            max_component_length: 255,
            flags: 0,
        }
    }
}

/// Free space figures for a drive root, in bytes.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serialize", derive(serde::Serialize))]
pub struct FreeSpace {
    /// Free bytes available to the calling user (honours quotas)
    pub available_to_caller: u64,
    /// Total capacity
    pub total_bytes: u64,
    /// Free bytes on the whole volume
    pub total_free: u64,
}

impl FreeSpace {
    /// Returns the bytes in use on the volume.
    pub fn used_bytes(&self) -> u64 {
        self.total_bytes.saturating_sub(self.total_free)
    }
}
