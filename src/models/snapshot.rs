use chrono::{DateTime, Local};

use crate::{DriveName, DriveType, FreeSpace, VolumeInformation};

/// Everything known about one drive at one instant.
///
/// Fields whose host query failed are `None`. A snapshot never refreshes
/// itself; take a new one to observe the current state.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serialize", derive(serde::Serialize))]
pub struct DriveSnapshot {
    pub name: DriveName,
    pub drive_type: DriveType,
    pub is_ready: bool,
    pub format: Option<String>,
    pub label: Option<String>,
    pub total_size: Option<u64>,
    pub total_free_space: Option<u64>,
    pub available_free_space: Option<u64>,
    pub captured_at: DateTime<Local>,
}

impl DriveSnapshot {
    pub(crate) fn new(
        name: DriveName,
        drive_type: DriveType,
        volume: Option<VolumeInformation>,
        space: Option<FreeSpace>,
    ) -> Self {
        let is_ready = volume.is_some();
        let (format, label) = match volume {
            Some(info) => (Some(info.file_system), Some(info.label)),
            None => (None, None),
        };

        DriveSnapshot {
            name,
            drive_type,
            is_ready,
            format,
            label,
            total_size: space.map(|s| s.total_bytes),
            total_free_space: space.map(|s| s.total_free),
            available_free_space: space.map(|s| s.available_to_caller),
            captured_at: Local::now(),
        }
    }

    pub fn name(&self) -> &DriveName {
        &self.name
    }

    /// Returns the bytes in use, when both sizes are known.
    pub fn used_bytes(&self) -> Option<u64> {
        let total = self.total_size?;
        let free = self.total_free_space?;
        Some(total.saturating_sub(free))
    }

    /// Usage percentage (0.0–100.0), when the sizes are known and non-zero.
    pub fn usage_percent(&self) -> Option<f32> {
        let total = self.total_size.filter(|&t| t > 0)?;
        let used = self.used_bytes()?;
        Some((used as f64 / total as f64 * 100.0) as f32)
    }
}
