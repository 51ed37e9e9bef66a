use serde::{Deserialize, Serialize};

use crate::install::model::{FileSystem, GptPartitionType};

/// A completed (or failed) step of applying a manifest
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Action {
    Drives(ActionDrive),
    Chroot(ActionChroot),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ActionDrive {
    #[serde(rename = "checkPartitionTable")]
    CheckPartitionTable { device: String },

    #[serde(rename = "snapshotDrive")]
    SnapshotDrive { device: String },

    #[serde(rename = "createPartitions")]
    CreatePartitions {
        device: String,
        append: bool,
        script: String,
    },

    #[serde(rename = "mapPartitions")]
    MapPartitions {
        device: String,
        requested: usize,
        created: usize,
    },

    #[serde(rename = "mapPartition")]
    MapPartition {
        node: String,
        partition_type: GptPartitionType,
    },

    #[serde(rename = "createFilesystem")]
    CreateFs {
        device: String,
        fs_type: String,
    },

    #[serde(rename = "createSwap")]
    CreateSwap { device: String },

    #[serde(rename = "mountFilesystem")]
    MountFs { src: String, dst: String },

    #[serde(rename = "swapOn")]
    SwapOn { device: String },

    #[serde(rename = "applyDrive")]
    ApplyDrive { device: String },

    #[serde(rename = "applyDrives")]
    ApplyDrives,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ActionChroot {
    #[serde(rename = "archChrootCmd")]
    ArchChrootCmd(String),
}

impl ActionDrive {
    pub(crate) fn create_fs(device: &str, fs: FileSystem) -> Self {
        Self::CreateFs {
            device: device.to_string(),
            fs_type: fs.to_string(),
        }
    }
}
