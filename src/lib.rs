mod drive_info;
mod host;
mod memory_host;
mod models;
#[cfg(windows)]
mod windows_storage;

pub use drive_info::*;
pub use host::*;
pub use memory_host::*;
pub use models::*;
#[cfg(windows)]
pub use windows_storage::*;

#[cfg(all(test, windows))]
mod tests {
    use super::*;

    #[test]
    fn it_works() {
        let drives = get_drives().unwrap();
        let listed = Drives::system().list().unwrap();

        println!("Drives:");
        for drive in drives {
            println!("{:?}", drive);
            assert!(listed.contains(&drive.name), "{} missing from list", drive.name);
        }
    }
}
