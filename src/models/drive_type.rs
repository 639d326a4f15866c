//! Drive type classification as reported by the host.

// Raw drive type codes returned by `GetDriveTypeW`. 0 is DRIVE_UNKNOWN.
const DRIVE_NO_ROOT_DIR: u32 = 1;
const DRIVE_REMOVABLE: u32 = 2;
const DRIVE_FIXED: u32 = 3;
const DRIVE_REMOTE: u32 = 4;
const DRIVE_CDROM: u32 = 5;
const DRIVE_RAMDISK: u32 = 6;

/// Represents the kind of device behind a drive letter.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serialize", derive(serde::Serialize))]
pub enum DriveType {
    /// The type cannot be determined
    #[default]
    Unknown,
    /// There is no volume mounted at the root, e.g. an unused letter
    NoRootDirectory,
    /// Removable media such as a USB stick or floppy
    Removable,
    /// Fixed media such as an internal disk
    Fixed,
    /// A network share
    Network,
    /// Optical media
    CDRom,
    /// A RAM disk
    Ram,
}

impl DriveType {
    /// Human-readable name of the drive type.
    pub fn display_name(self) -> &'static str {
        match self {
            DriveType::Unknown => "Unknown",
            DriveType::NoRootDirectory => "No root directory",
            DriveType::Removable => "Removable",
            DriveType::Fixed => "Fixed",
            DriveType::Network => "Network",
            DriveType::CDRom => "CD-ROM",
            DriveType::Ram => "RAM disk",
        }
    }

    /// Returns whether the volume label of this kind of drive may be changed.
    ///
    /// Network shares and optical media never accept a new label.
    pub fn allows_label_change(self) -> bool {
        !matches!(self, DriveType::Network | DriveType::CDRom)
    }
}

impl From<u32> for DriveType {
    fn from(code: u32) -> Self {
        match code {
            DRIVE_NO_ROOT_DIR => DriveType::NoRootDirectory,
            DRIVE_REMOVABLE => DriveType::Removable,
            DRIVE_FIXED => DriveType::Fixed,
            DRIVE_REMOTE => DriveType::Network,
            DRIVE_CDROM => DriveType::CDRom,
            DRIVE_RAMDISK => DriveType::Ram,
            _ => DriveType::Unknown,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_drive_type_from_code() {
        assert_eq!(DriveType::from(0), DriveType::Unknown);
        assert_eq!(DriveType::from(1), DriveType::NoRootDirectory);
        assert_eq!(DriveType::from(2), DriveType::Removable);
        assert_eq!(DriveType::from(3), DriveType::Fixed);
        assert_eq!(DriveType::from(4), DriveType::Network);
        assert_eq!(DriveType::from(5), DriveType::CDRom);
        assert_eq!(DriveType::from(6), DriveType::Ram);
        assert_eq!(DriveType::from(42), DriveType::Unknown);
    }

    #[test]
    fn test_display_name() {
        assert_eq!(DriveType::CDRom.display_name(), "CD-ROM");
        assert_eq!(DriveType::NoRootDirectory.display_name(), "No root directory");
    }

    #[test]
    fn test_label_change_allowed() {
        assert!(DriveType::Fixed.allows_label_change());
        assert!(DriveType::Removable.allows_label_change());
        assert!(!DriveType::Network.allows_label_change());
        assert!(!DriveType::CDRom.allows_label_change());
    }
}
