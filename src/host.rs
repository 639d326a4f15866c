//! The host drive/volume facility consumed by the query facade.
//!
//! A `VolumeHost` answers the four questions the operating system can answer
//! about drive letters: which are present, what type each one is, its volume
//! information and its free space. It also performs label writes. Hosts
//! report raw outcomes; translating them into [`DriveError`](crate::DriveError)
//! is the facade's job.

use std::collections::BTreeSet;

use thiserror::Error;

use crate::{DriveName, DriveType, FreeSpace, VolumeInformation};

// Win32 error codes the facade distinguishes.
const ERROR_FILE_NOT_FOUND: u32 = 2;
const ERROR_PATH_NOT_FOUND: u32 = 3;
const ERROR_ACCESS_DENIED: u32 = 5;
const ERROR_INVALID_DRIVE: u32 = 15;
const ERROR_WRITE_PROTECT: u32 = 19;
const ERROR_NOT_READY: u32 = 21;
const ERROR_INVALID_NAME: u32 = 123;
const ERROR_LABEL_TOO_LONG: u32 = 154;

/// Raw outcome of a failed host query.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum HostError {
    #[error("the drive root does not exist")]
    NotFound,
    #[error("the device is not ready")]
    NotReady,
    #[error("access is denied")]
    AccessDenied,
    #[error("the name is not valid for this volume")]
    InvalidName,
    #[error("operating system error {code}")]
    Os { code: u32 },
}

impl HostError {
    /// Classifies a Win32 error code.
    pub fn from_win32(code: u32) -> Self {
        match code {
            ERROR_FILE_NOT_FOUND | ERROR_PATH_NOT_FOUND | ERROR_INVALID_DRIVE => HostError::NotFound,
            ERROR_NOT_READY => HostError::NotReady,
            ERROR_ACCESS_DENIED | ERROR_WRITE_PROTECT => HostError::AccessDenied,
            ERROR_INVALID_NAME | ERROR_LABEL_TOO_LONG => HostError::InvalidName,
            code => HostError::Os { code },
        }
    }
}

/// The set of drive letters a host currently reports as present.
///
/// Iterates in ascending letter order.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct DriveSet {
    letters: BTreeSet<char>,
}

impl DriveSet {
    pub fn new() -> Self {
        DriveSet::default()
    }

    /// Converts a logical drive bitmask, bit 0 being `A`.
    ///
    /// # Examples
    ///
    /// ```
    /// use win_drive_info::DriveSet;
    ///
    /// let set = DriveSet::from_bitmask(0b1100);
    /// assert_eq!(set.iter().collect::<String>(), "CD");
    /// ```
    pub fn from_bitmask(mask: u32) -> Self {
        (b'A'..=b'Z')
            .enumerate()
            .filter(|&(bit, _)| mask & (1 << bit) != 0)
            .map(|(_, letter)| letter as char)
            .collect()
    }

    /// Adds a letter, returning whether it was newly inserted.
    ///
    /// Anything other than an ASCII letter is ignored.
    pub fn insert(&mut self, letter: char) -> bool {
        letter.is_ascii_alphabetic() && self.letters.insert(letter.to_ascii_uppercase())
    }

    pub fn contains(&self, letter: char) -> bool {
        self.letters.contains(&letter.to_ascii_uppercase())
    }

    pub fn len(&self) -> usize {
        self.letters.len()
    }

    pub fn is_empty(&self) -> bool {
        self.letters.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = char> + '_ {
        self.letters.iter().copied()
    }

    /// Returns a drive name for every present letter.
    pub fn names(&self) -> Vec<DriveName> {
        self.iter().map(DriveName::from_valid_letter).collect()
    }
}

impl FromIterator<char> for DriveSet {
    fn from_iter<I: IntoIterator<Item = char>>(iter: I) -> Self {
        let mut set = DriveSet::new();
        for letter in iter {
            set.insert(letter);
        }
        set
    }
}

/// A drive/volume query facility.
///
/// Every method consults the live state of the host; implementations must
/// not cache answers between calls.
pub trait VolumeHost: Send + Sync {
    /// Returns the letters currently present.
    fn present_drives(&self) -> Result<DriveSet, HostError>;

    /// Returns the type of the drive, `NoRootDirectory` when nothing is
    /// mounted there.
    fn drive_type(&self, drive: &DriveName) -> DriveType;

    fn volume_information(&self, drive: &DriveName) -> Result<VolumeInformation, HostError>;

    fn free_space(&self, drive: &DriveName) -> Result<FreeSpace, HostError>;

    /// Replaces the volume label. An empty label clears it.
    ///
    /// A failed write must leave the existing label untouched.
    fn set_volume_label(&self, drive: &DriveName, label: &str) -> Result<(), HostError>;
}

impl<H: VolumeHost + ?Sized> VolumeHost for &H {
    fn present_drives(&self) -> Result<DriveSet, HostError> {
        (**self).present_drives()
    }

    fn drive_type(&self, drive: &DriveName) -> DriveType {
        (**self).drive_type(drive)
    }

    fn volume_information(&self, drive: &DriveName) -> Result<VolumeInformation, HostError> {
        (**self).volume_information(drive)
    }

    fn free_space(&self, drive: &DriveName) -> Result<FreeSpace, HostError> {
        (**self).free_space(drive)
    }

    fn set_volume_label(&self, drive: &DriveName, label: &str) -> Result<(), HostError> {
        (**self).set_volume_label(drive, label)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_win32() {
        assert_eq!(HostError::from_win32(2), HostError::NotFound);
        assert_eq!(HostError::from_win32(3), HostError::NotFound);
        assert_eq!(HostError::from_win32(15), HostError::NotFound);
        assert_eq!(HostError::from_win32(21), HostError::NotReady);
        assert_eq!(HostError::from_win32(5), HostError::AccessDenied);
        assert_eq!(HostError::from_win32(19), HostError::AccessDenied);
        assert_eq!(HostError::from_win32(123), HostError::InvalidName);
        assert_eq!(HostError::from_win32(154), HostError::InvalidName);
        assert_eq!(HostError::from_win32(1117), HostError::Os { code: 1117 });
    }

    #[test]
    fn test_drive_set_from_bitmask() {
        assert!(DriveSet::from_bitmask(0).is_empty());

        let set = DriveSet::from_bitmask(0b101 | 1 << 25);
        assert_eq!(set.iter().collect::<Vec<_>>(), vec!['A', 'C', 'Z']);
        assert!(set.contains('c'));
        assert!(!set.contains('B'));

        // Bits above Z are not drive letters.
        assert_eq!(DriveSet::from_bitmask(u32::MAX).len(), 26);
    }

    #[test]
    fn test_drive_set_normalizes_letters() {
        let set: DriveSet = ['d', 'C', 'D', '1', ' '].into_iter().collect();
        assert_eq!(set.iter().collect::<String>(), "CD");

        let roots: Vec<String> = set.names().iter().map(|d| d.root().to_string()).collect();
        assert_eq!(roots, vec!["C:\\", "D:\\"]);
    }
}
