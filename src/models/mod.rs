mod drive_error;
mod drive_name;
mod drive_type;
mod snapshot;
mod volume;

pub use drive_error::DriveError;
pub use drive_name::DriveName;
pub use drive_type::DriveType;
pub use snapshot::DriveSnapshot;
pub use volume::{FreeSpace, VolumeInformation};
