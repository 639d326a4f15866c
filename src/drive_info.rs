//! The drive query facade.
//!
//! `Drives` answers type, format, space and label questions about drive
//! letters by asking its [`VolumeHost`] on every call. Nothing is cached: a
//! drive that was present a moment ago may be gone on the next query, and
//! the answer reflects that.

use tracing::{debug, warn};

use crate::{
    DriveError, DriveName, DriveSnapshot, DriveType, FreeSpace, HostError, VolumeHost,
    VolumeInformation,
};

/// Drive queries against a host.
///
/// # Examples
///
/// ```
/// use win_drive_info::{DriveError, DriveType, Drives, MemoryHost, SimulatedVolume};
///
/// let host = MemoryHost::new().with_volume(
///     'C',
///     SimulatedVolume::new(DriveType::Fixed).with_label("System"),
/// );
/// let drives = Drives::new(host);
///
/// let c = drives.drive("c:").unwrap();
/// assert_eq!(c.volume_label().unwrap(), "System");
///
/// let q = drives.drive("Q").unwrap();
/// assert_eq!(q.drive_type(), DriveType::NoRootDirectory);
/// assert!(matches!(q.drive_format(), Err(DriveError::DriveNotFound { .. })));
/// ```
#[derive(Debug, Default)]
pub struct Drives<H> {
    host: H,
}

impl<H: VolumeHost> Drives<H> {
    pub fn new(host: H) -> Self {
        Drives { host }
    }

    /// Returns the underlying host.
    pub fn host(&self) -> &H {
        &self.host
    }

    /// Parses a drive name and binds it to this facade.
    pub fn drive(&self, input: &str) -> Result<DriveInfo<'_, H>, DriveError> {
        Ok(self.bind(DriveName::parse(input)?))
    }

    /// Binds an already parsed drive name to this facade.
    pub fn bind(&self, name: DriveName) -> DriveInfo<'_, H> {
        DriveInfo { name, drives: self }
    }

    /// Lists every drive the host currently reports, in letter order.
    pub fn list(&self) -> Result<Vec<DriveName>, DriveError> {
        let present = self.host.present_drives().map_err(|err| {
            warn!(error = %err, "drive enumeration failed");
            DriveError::Enumeration(err)
        })?;
        debug!(count = present.len(), "enumerated drives");
        Ok(present.names())
    }

    /// Returns the drive type. Absent letters are `NoRootDirectory`.
    pub fn drive_type(&self, name: &DriveName) -> DriveType {
        match self.is_present(name) {
            Ok(true) => self.host.drive_type(name),
            _ => DriveType::NoRootDirectory,
        }
    }

    /// Returns whether the drive is present and its volume can be read.
    pub fn is_ready(&self, name: &DriveName) -> bool {
        matches!(self.is_present(name), Ok(true)) && self.host.volume_information(name).is_ok()
    }

    /// Returns the file system name, e.g. `NTFS`.
    pub fn drive_format(&self, name: &DriveName) -> Result<String, DriveError> {
        Ok(self.volume_information(name)?.file_system)
    }

    /// Returns the volume label, possibly empty.
    pub fn volume_label(&self, name: &DriveName) -> Result<String, DriveError> {
        Ok(self.volume_information(name)?.label)
    }

    /// Returns the total capacity in bytes.
    pub fn total_size(&self, name: &DriveName) -> Result<u64, DriveError> {
        Ok(self.free_space(name)?.total_bytes)
    }

    /// Returns the free bytes on the whole volume.
    pub fn total_free_space(&self, name: &DriveName) -> Result<u64, DriveError> {
        Ok(self.free_space(name)?.total_free)
    }

    /// Returns the free bytes available to the caller, after quotas.
    pub fn available_free_space(&self, name: &DriveName) -> Result<u64, DriveError> {
        Ok(self.free_space(name)?.available_to_caller)
    }

    /// Returns the raw volume information of a present drive.
    pub fn volume_information(&self, name: &DriveName) -> Result<VolumeInformation, DriveError> {
        self.ensure_present(name)?;
        let result = self.host.volume_information(name);
        debug!(drive = %name, ok = result.is_ok(), "queried volume information");
        result.map_err(|err| read_error(name, err))
    }

    /// Returns the raw free space figures of a present drive.
    ///
    /// A present drive whose space cannot be read fails with
    /// [`DriveError::Io`]; no placeholder value is ever returned.
    pub fn free_space(&self, name: &DriveName) -> Result<FreeSpace, DriveError> {
        self.ensure_present(name)?;
        let result = self.host.free_space(name);
        debug!(drive = %name, ok = result.is_ok(), "queried free space");
        result.map_err(|err| read_error(name, err))
    }

    /// Replaces the volume label. An empty label clears it.
    ///
    /// Network shares and optical drives are refused before anything is
    /// written. On failure the label is left as it was.
    pub fn set_volume_label(&self, name: &DriveName, label: &str) -> Result<(), DriveError> {
        self.ensure_present(name)?;

        let drive_type = self.host.drive_type(name);
        if !drive_type.allows_label_change() {
            debug!(drive = %name, ?drive_type, "label change refused for drive type");
            return Err(DriveError::PermissionDenied {
                root: name.root().to_string(),
            });
        }

        self.host.set_volume_label(name, label).map_err(|err| {
            warn!(drive = %name, error = %err, "failed to set volume label");
            match err {
                HostError::NotFound => not_found(name),
                HostError::AccessDenied => DriveError::PermissionDenied {
                    root: name.root().to_string(),
                },
                HostError::InvalidName => DriveError::InvalidLabel {
                    label: label.to_string(),
                },
                err => DriveError::Io {
                    root: name.root().to_string(),
                    source: err,
                },
            }
        })?;

        debug!(drive = %name, label, "volume label set");
        Ok(())
    }

    /// Gathers every field of one drive. Failed queries become `None`.
    pub fn snapshot(&self, name: &DriveName) -> DriveSnapshot {
        DriveSnapshot::new(
            name.clone(),
            self.drive_type(name),
            self.volume_information(name).ok(),
            self.free_space(name).ok(),
        )
    }

    /// Snapshots every present drive.
    pub fn snapshots(&self) -> Result<Vec<DriveSnapshot>, DriveError> {
        Ok(self
            .list()?
            .iter()
            .map(|name| self.snapshot(name))
            .collect())
    }

    fn is_present(&self, name: &DriveName) -> Result<bool, DriveError> {
        let present = self
            .host
            .present_drives()
            .map_err(DriveError::Enumeration)?;
        Ok(present.contains(name.letter()))
    }

    fn ensure_present(&self, name: &DriveName) -> Result<(), DriveError> {
        if self.is_present(name)? {
            Ok(())
        } else {
            debug!(drive = %name, "drive not present");
            Err(not_found(name))
        }
    }
}

fn not_found(name: &DriveName) -> DriveError {
    DriveError::DriveNotFound {
        root: name.root().to_string(),
    }
}

/// Translates a failed read of a drive that was present when checked.
fn read_error(name: &DriveName, err: HostError) -> DriveError {
    match err {
        HostError::NotFound => not_found(name),
        err => {
            warn!(drive = %name, error = %err, "drive query failed");
            DriveError::Io {
                root: name.root().to_string(),
                source: err,
            }
        }
    }
}

/// One drive bound to a [`Drives`] facade.
///
/// Every accessor queries the host again.
#[derive(Debug)]
pub struct DriveInfo<'a, H> {
    name: DriveName,
    drives: &'a Drives<H>,
}

impl<'a, H: VolumeHost> DriveInfo<'a, H> {
    pub fn name(&self) -> &DriveName {
        &self.name
    }

    pub fn drive_type(&self) -> DriveType {
        self.drives.drive_type(&self.name)
    }

    pub fn is_ready(&self) -> bool {
        self.drives.is_ready(&self.name)
    }

    pub fn drive_format(&self) -> Result<String, DriveError> {
        self.drives.drive_format(&self.name)
    }

    pub fn volume_label(&self) -> Result<String, DriveError> {
        self.drives.volume_label(&self.name)
    }

    pub fn set_volume_label(&self, label: &str) -> Result<(), DriveError> {
        self.drives.set_volume_label(&self.name, label)
    }

    pub fn total_size(&self) -> Result<u64, DriveError> {
        self.drives.total_size(&self.name)
    }

    pub fn total_free_space(&self) -> Result<u64, DriveError> {
        self.drives.total_free_space(&self.name)
    }

    pub fn available_free_space(&self) -> Result<u64, DriveError> {
        self.drives.available_free_space(&self.name)
    }

    pub fn snapshot(&self) -> DriveSnapshot {
        self.drives.snapshot(&self.name)
    }
}

impl<H> std::fmt::Display for DriveInfo<'_, H> {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        std::fmt::Display::fmt(&self.name, f)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{DriveSet, MemoryHost, SimulatedVolume};

    /// A host whose enumeration always fails.
    struct BrokenHost;

    impl VolumeHost for BrokenHost {
        fn present_drives(&self) -> Result<DriveSet, HostError> {
            Err(HostError::Os { code: 1117 })
        }

        fn drive_type(&self, _drive: &DriveName) -> DriveType {
            DriveType::Fixed
        }

        fn volume_information(&self, _drive: &DriveName) -> Result<VolumeInformation, HostError> {
            Ok(VolumeInformation::new("", "NTFS"))
        }

        fn free_space(&self, _drive: &DriveName) -> Result<FreeSpace, HostError> {
            Ok(FreeSpace::default())
        }

        fn set_volume_label(&self, _drive: &DriveName, _label: &str) -> Result<(), HostError> {
            Ok(())
        }
    }

    /// A host that reports `C` as present but fails every query on it.
    struct FailingHost {
        volume: HostError,
        space: HostError,
        label: HostError,
    }

    impl VolumeHost for FailingHost {
        fn present_drives(&self) -> Result<DriveSet, HostError> {
            Ok(['C'].into_iter().collect())
        }

        fn drive_type(&self, _drive: &DriveName) -> DriveType {
            DriveType::Fixed
        }

        fn volume_information(&self, _drive: &DriveName) -> Result<VolumeInformation, HostError> {
            Err(self.volume)
        }

        fn free_space(&self, _drive: &DriveName) -> Result<FreeSpace, HostError> {
            Err(self.space)
        }

        fn set_volume_label(&self, _drive: &DriveName, _label: &str) -> Result<(), HostError> {
            Err(self.label)
        }
    }

    #[test]
    fn test_failures_on_present_drive_are_translated() {
        let drives = Drives::new(FailingHost {
            volume: HostError::NotFound,
            space: HostError::Os { code: 1117 },
            label: HostError::Os { code: 1117 },
        });
        let c = drives.drive("C").unwrap();

        assert!(!c.is_ready());
        assert_eq!(
            c.drive_format(),
            Err(DriveError::DriveNotFound {
                root: "C:\\".to_string()
            })
        );
        assert_eq!(
            c.total_size(),
            Err(DriveError::Io {
                root: "C:\\".to_string(),
                source: HostError::Os { code: 1117 },
            })
        );
        assert_eq!(
            c.set_volume_label("Data"),
            Err(DriveError::Io {
                root: "C:\\".to_string(),
                source: HostError::Os { code: 1117 },
            })
        );
    }

    #[test]
    fn test_label_write_failures_are_translated() {
        let cases = [
            (
                HostError::NotFound,
                DriveError::DriveNotFound {
                    root: "C:\\".to_string(),
                },
            ),
            (
                HostError::AccessDenied,
                DriveError::PermissionDenied {
                    root: "C:\\".to_string(),
                },
            ),
            (
                HostError::InvalidName,
                DriveError::InvalidLabel {
                    label: "Data".to_string(),
                },
            ),
            (
                HostError::NotReady,
                DriveError::Io {
                    root: "C:\\".to_string(),
                    source: HostError::NotReady,
                },
            ),
        ];

        for (host_error, expected) in cases {
            let drives = Drives::new(FailingHost {
                volume: HostError::NotReady,
                space: HostError::NotReady,
                label: host_error,
            });
            let c = drives.drive("c:").unwrap();
            assert_eq!(c.set_volume_label("Data"), Err(expected));
        }
    }

    #[test]
    fn test_enumeration_failure() {
        let drives = Drives::new(BrokenHost);
        let c = drives.drive("C").unwrap();

        assert_eq!(
            drives.list(),
            Err(DriveError::Enumeration(HostError::Os { code: 1117 }))
        );
        assert!(!c.is_ready());
        assert_eq!(c.drive_type(), DriveType::NoRootDirectory);
        assert!(matches!(c.total_size(), Err(DriveError::Enumeration(_))));
    }

    #[test]
    fn test_display_of_bound_drive() {
        let drives = Drives::new(MemoryHost::new());
        let drive = drives.drive("x:/").unwrap();
        assert_eq!(drive.to_string(), "X:\\");
        assert_eq!(drive.name().letter(), 'X');
    }

    #[test]
    fn test_host_type_is_not_consulted_for_absent_letter() {
        let host = MemoryHost::new().with_volume('c', SimulatedVolume::new(DriveType::Ram));
        let drives = Drives::new(host);

        assert_eq!(drives.drive("c").unwrap().drive_type(), DriveType::Ram);
        assert_eq!(
            drives.drive("d").unwrap().drive_type(),
            DriveType::NoRootDirectory
        );
    }
}
