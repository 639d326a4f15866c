//! An in-memory host for running drive queries without real hardware.
//!
//! `MemoryHost` keeps a table of simulated volumes keyed by letter. The table
//! can be changed at any time (media ejected, shares unmapped), which makes it
//! suitable for exercising the facade's live-state behaviour.

use std::collections::BTreeMap;

use parking_lot::RwLock;

use crate::{
    DriveName, DriveSet, DriveType, FreeSpace, HostError, VolumeHost, VolumeInformation,
};

/// Longest label accepted by the simulated file systems.
pub const MAX_LABEL_LEN: usize = 32;

/// Characters a volume label may not contain.
const FORBIDDEN_LABEL_CHARS: &[char] = &['\\', '/', ':', '*', '?', '"', '<', '>', '|', '\t'];

/// A volume mounted on a [`MemoryHost`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SimulatedVolume {
    drive_type: DriveType,
    ready: bool,
    read_only: bool,
    info: VolumeInformation,
    space: FreeSpace,
    quota: Option<u64>,
}

impl SimulatedVolume {
    /// Creates a ready, writable, empty NTFS volume of the given type.
    ///
    /// # Examples
    ///
    /// ```
    /// use win_drive_info::{DriveType, SimulatedVolume};
    ///
    /// let usb = SimulatedVolume::new(DriveType::Removable)
    ///     .with_format("FAT32")
    ///     .with_label("STICK")
    ///     .with_space(8_000_000_000, 6_000_000_000);
    /// ```
    pub fn new(drive_type: DriveType) -> Self {
        SimulatedVolume {
            drive_type,
            ready: true,
            read_only: false,
            info: VolumeInformation::new("", "NTFS"),
            space: FreeSpace::default(),
            quota: None,
        }
    }

    pub fn with_format(mut self, file_system: impl Into<String>) -> Self {
        self.info.file_system = file_system.into();
        self
    }

    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.info.label = label.into();
        self
    }

    pub fn with_serial_number(mut self, serial_number: u32) -> Self {
        self.info.serial_number = serial_number;
        self
    }

    /// Sets total size and free space. Without a quota the caller sees all
    /// free space.
    pub fn with_space(mut self, total_bytes: u64, free_bytes: u64) -> Self {
        self.space = FreeSpace {
            available_to_caller: free_bytes,
            total_bytes,
            total_free: free_bytes,
        };
        self.apply_quota();
        self
    }

    /// Limits the free space the caller may use, as a quota would.
    ///
    /// May be given before or after [`with_space`](Self::with_space).
    pub fn with_quota(mut self, available_to_caller: u64) -> Self {
        self.quota = Some(available_to_caller);
        self.apply_quota();
        self
    }

    fn apply_quota(&mut self) {
        let total_free = self.space.total_free;
        self.space.available_to_caller = self.quota.map_or(total_free, |q| q.min(total_free));
    }

    pub fn with_ready(mut self, ready: bool) -> Self {
        self.ready = ready;
        self
    }

    /// Marks the volume as refusing writes, including label changes.
    pub fn read_only(mut self) -> Self {
        self.read_only = true;
        self
    }

    pub fn drive_type(&self) -> DriveType {
        self.drive_type
    }

    pub fn label(&self) -> &str {
        &self.info.label
    }

    fn check_label(label: &str) -> Result<(), HostError> {
        if label.chars().count() > MAX_LABEL_LEN || label.contains(FORBIDDEN_LABEL_CHARS) {
            return Err(HostError::InvalidName);
        }
        Ok(())
    }
}

/// A [`VolumeHost`] backed by an in-memory table.
#[derive(Debug, Default)]
pub struct MemoryHost {
    volumes: RwLock<BTreeMap<char, SimulatedVolume>>,
}

impl MemoryHost {
    pub fn new() -> Self {
        MemoryHost::default()
    }

    /// Adds a volume while building the host.
    pub fn with_volume(self, letter: char, volume: SimulatedVolume) -> Self {
        self.insert(letter, volume);
        self
    }

    /// Mounts a volume, replacing whatever was on that letter.
    pub fn insert(&self, letter: char, volume: SimulatedVolume) -> Option<SimulatedVolume> {
        self.volumes
            .write()
            .insert(letter.to_ascii_uppercase(), volume)
    }

    /// Unmounts the volume on a letter.
    pub fn remove(&self, letter: char) -> Option<SimulatedVolume> {
        self.volumes.write().remove(&letter.to_ascii_uppercase())
    }

    /// Inserts or ejects the media of a present drive.
    ///
    /// Returns `false` when no drive is mounted on the letter.
    pub fn set_ready(&self, letter: char, ready: bool) -> bool {
        match self.volumes.write().get_mut(&letter.to_ascii_uppercase()) {
            Some(volume) => {
                volume.ready = ready;
                true
            }
            None => false,
        }
    }

    /// Returns a copy of the volume on a letter.
    pub fn volume(&self, letter: char) -> Option<SimulatedVolume> {
        self.volumes
            .read()
            .get(&letter.to_ascii_uppercase())
            .cloned()
    }

    fn with_ready_volume<T>(
        &self,
        drive: &DriveName,
        f: impl FnOnce(&SimulatedVolume) -> T,
    ) -> Result<T, HostError> {
        let volumes = self.volumes.read();
        let volume = volumes.get(&drive.letter()).ok_or(HostError::NotFound)?;
        if !volume.ready {
            return Err(HostError::NotReady);
        }
        Ok(f(volume))
    }
}

impl VolumeHost for MemoryHost {
    fn present_drives(&self) -> Result<DriveSet, HostError> {
        Ok(self.volumes.read().keys().copied().collect())
    }

    fn drive_type(&self, drive: &DriveName) -> DriveType {
        self.volumes
            .read()
            .get(&drive.letter())
            .map_or(DriveType::NoRootDirectory, |volume| volume.drive_type)
    }

    fn volume_information(&self, drive: &DriveName) -> Result<VolumeInformation, HostError> {
        self.with_ready_volume(drive, |volume| volume.info.clone())
    }

    fn free_space(&self, drive: &DriveName) -> Result<FreeSpace, HostError> {
        self.with_ready_volume(drive, |volume| volume.space)
    }

    fn set_volume_label(&self, drive: &DriveName, label: &str) -> Result<(), HostError> {
        // Validation and update happen under one write lock.
        let mut volumes = self.volumes.write();
        let volume = volumes
            .get_mut(&drive.letter())
            .ok_or(HostError::NotFound)?;

        if !volume.ready {
            return Err(HostError::NotReady);
        }
        if volume.read_only || !volume.drive_type.allows_label_change() {
            return Err(HostError::AccessDenied);
        }
        SimulatedVolume::check_label(label)?;

        volume.info.label = label.to_string();
        Ok(())
    }
}
