//! Lists logical drives, or sets the volume label of one drive.

use anyhow::{bail, Context, Result};
use clap::Parser;
use tracing::debug;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};
use win_drive_info::{DriveName, DriveSnapshot, Drives, VolumeHost};

#[derive(Parser)]
#[command(about = "Show drive type, format, label and space of logical drives")]
struct Cli {
    /// Drives to show, e.g. `C` or `D:\`. Defaults to every present drive.
    drives: Vec<String>,

    /// Set the volume label of the single drive given. An empty value clears it.
    #[arg(long, value_name = "LABEL")]
    set_label: Option<String>,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(EnvFilter::from_default_env())
        .init();
    debug!("Starting up drive-info");

    run(&system_drives()?, cli)
}

#[cfg(windows)]
fn system_drives() -> Result<Drives<win_drive_info::WindowsHost>> {
    Ok(Drives::system())
}

#[cfg(not(windows))]
fn system_drives() -> Result<Drives<win_drive_info::MemoryHost>> {
    bail!("drive letters are only available on Windows")
}

fn run<H: VolumeHost>(drives: &Drives<H>, cli: Cli) -> Result<()> {
    let names = cli
        .drives
        .iter()
        .map(|input| DriveName::parse(input))
        .collect::<Result<Vec<_>, _>>()?;

    if let Some(label) = cli.set_label {
        let [name] = names.as_slice() else {
            bail!("--set-label needs exactly one drive");
        };
        drives
            .set_volume_label(name, &label)
            .with_context(|| format!("could not label {name}"))?;
        println!("{name} labelled {label:?}");
        return Ok(());
    }

    let snapshots = if names.is_empty() {
        drives.snapshots()?
    } else {
        names.iter().map(|name| drives.snapshot(name)).collect()
    };

    for snapshot in &snapshots {
        println!("{}", describe(snapshot));
    }
    Ok(())
}

fn describe(snapshot: &DriveSnapshot) -> String {
    let mut line = format!("{:<4} {:<17}", snapshot.name, snapshot.drive_type.display_name());
    if !snapshot.is_ready {
        line.push_str(" not ready");
        return line;
    }

    let format = snapshot.format.as_deref().unwrap_or("?");
    let label = snapshot.label.as_deref().unwrap_or_default();
    line.push_str(&format!(" {format:<6} {label:<20}"));

    if let (Some(used), Some(total)) = (snapshot.used_bytes(), snapshot.total_size) {
        line.push_str(&format!(
            " {} / {} used",
            format_size(used),
            format_size(total)
        ));
        if let Some(percent) = snapshot.usage_percent() {
            line.push_str(&format!(" ({percent:.1}%)"));
        }
    }
    line
}

/// Format a byte count with binary units.
fn format_size(bytes: u64) -> String {
    const KB: f64 = 1024.0;
    const MB: f64 = KB * 1024.0;
    const GB: f64 = MB * 1024.0;
    const TB: f64 = GB * 1024.0;

    let b = bytes as f64;
    if b < KB {
        format!("{bytes} B")
    } else if b < MB {
        format!("{:.1} KB", b / KB)
    } else if b < GB {
        format!("{:.1} MB", b / MB)
    } else if b < TB {
        format!("{:.2} GB", b / GB)
    } else {
        format!("{:.2} TB", b / TB)
    }
}
