use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::install::model::{Partition, PartitionSize};
use crate::utils::shell::Cmd;

/// Drive state as reported by `sfdisk --json {device}`:
///
/// ```json
/// { "partitiontable": { "device": "/dev/sda", "partitions": [ { "node": "/dev/sda1" } ] } }
/// ```
///
/// Other fields reported by sfdisk (label, id, start, size, type, ...)
/// are ignored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SfdiskDump {
    #[serde(rename = "partitiontable")]
    pub partition_table: DriveSnapshot,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DriveSnapshot {
    pub device: String,

    // sfdisk omits the array for empty tables
    #[serde(default)]
    pub partitions: Vec<SnapshotPartition>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SnapshotPartition {
    pub node: String,
}

impl DriveSnapshot {
    pub fn nodes(&self) -> impl Iterator<Item = &str> {
        self.partitions.iter().map(|p| p.node.as_str())
    }
}

pub fn parse_dump(json: &str) -> Result<DriveSnapshot, serde_json::Error> {
    serde_json::from_str::<SfdiskDump>(json).map(|dump| dump.partition_table)
}

/// Executes:
/// ```shell
/// sfdisk --json {device}
/// ```
pub fn cmd_dump(device: &str) -> Cmd {
    Cmd::new("sfdisk", &["--json", device])
}

/// Executes:
/// ```shell
/// sfdisk --label gpt {device} < {script}
///
/// # or, if append:
///
/// sfdisk --append {device} < {script}
/// ```
pub fn cmd_apply(device: &str, append: bool, script: &Path) -> Cmd {
    let cmd = match append {
        true => Cmd::new("sfdisk", &["--append", device]),
        false => Cmd::new("sfdisk", &["--label", "gpt", device]),
    };

    cmd.stdin_file(script)
}

/// Renders one sfdisk script line per partition, in order:
///
/// ```text
/// type=C12A7328-F81F-11D2-BA4B-00A0C93EC93B, size=512MiB
/// type=4F68BCE3-E8CD-4DB1-96E7-FBCAF984B709, size=+
/// ```
///
/// Line order is what later pairs created nodes with their partitions,
/// so partitions must never be reordered here.
pub fn render_script(partitions: &[Partition]) -> String {
    partitions
        .iter()
        .map(|part| {
            format!(
                "type={}, size={}\n",
                part.partition_type.uuid(),
                size_spec(&part.size)
            )
        })
        .collect()
}

fn size_spec(size: &PartitionSize) -> String {
    // A fixed size always has both amount and unit
    match (size.take_remaining(), size.amount(), size.unit()) {
        (false, Some(amount), Some(unit)) => format!("{amount}{unit}"),
        _ => "+".to_string(),
    }
}
