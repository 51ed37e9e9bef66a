//! Typed partition layout, converted from the raw [`Manifest`](super::Manifest)
//! entries. Closed sets (partition types, filesystems and size units)
//! are enums, and parsing a raw string with `FromStr` is their
//! membership check.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::{ManifestDrive, ManifestPartition, ManifestSize};
use crate::errors::OctError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum GptPartitionType {
    Efi,
    Swap,
    Root,
    Home,
    GenericFilesystem,
}

impl GptPartitionType {
    pub const ALL: [Self; 5] = [
        Self::Efi,
        Self::Swap,
        Self::Root,
        Self::Home,
        Self::GenericFilesystem,
    ];

    /// GPT partition type GUID
    pub fn uuid(&self) -> &'static str {
        match self {
            Self::Efi => "C12A7328-F81F-11D2-BA4B-00A0C93EC93B",
            Self::Swap => "0657FD6D-A4AB-43C4-84E5-0933C84B4F4F",
            // x86-64 root
            Self::Root => "4F68BCE3-E8CD-4DB1-96E7-FBCAF984B709",
            Self::Home => "933AC7E1-2EB4-4F13-B844-0E14E2AEF915",
            Self::GenericFilesystem => "0FC63DAF-8483-4772-8E79-3D69D8477DE4",
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::Efi => "EFI",
            Self::Swap => "SWAP",
            Self::Root => "ROOT",
            Self::Home => "HOME",
            Self::GenericFilesystem => "GENERIC_FILESYSTEM",
        }
    }

    /// EFI, swap and root have implicit mount targets
    pub fn has_fixed_mount(&self) -> bool {
        matches!(self, Self::Efi | Self::Swap | Self::Root)
    }

    /// EFI and swap are formatted with fixed tools
    pub fn needs_file_system(&self) -> bool {
        !matches!(self, Self::Efi | Self::Swap)
    }
}

impl FromStr for GptPartitionType {
    type Err = OctError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|t| t.name().eq_ignore_ascii_case(s))
            .ok_or_else(|| {
                OctError::validation(
                    "partitionType",
                    format!("unsupported partition type {s:?}"),
                )
            })
    }
}

impl fmt::Display for GptPartitionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FileSystem {
    Ext4,
    Btrfs,
}

impl FileSystem {
    pub const ALL: [Self; 2] = [Self::Ext4, Self::Btrfs];

    pub fn name(&self) -> &'static str {
        match self {
            Self::Ext4 => "ext4",
            Self::Btrfs => "btrfs",
        }
    }
}

impl FromStr for FileSystem {
    type Err = OctError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|fs| fs.name() == s)
            .ok_or_else(|| {
                OctError::validation(
                    "fileSystem",
                    format!("unsupported filesystem {s:?}"),
                )
            })
    }
}

impl fmt::Display for FileSystem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Binary size units understood by sfdisk
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SizeUnit {
    KiB,
    MiB,
    GiB,
    TiB,
    PiB,
    EiB,
    ZiB,
    YiB,
}

impl SizeUnit {
    pub const ALL: [Self; 8] = [
        Self::KiB,
        Self::MiB,
        Self::GiB,
        Self::TiB,
        Self::PiB,
        Self::EiB,
        Self::ZiB,
        Self::YiB,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Self::KiB => "KiB",
            Self::MiB => "MiB",
            Self::GiB => "GiB",
            Self::TiB => "TiB",
            Self::PiB => "PiB",
            Self::EiB => "EiB",
            Self::ZiB => "ZiB",
            Self::YiB => "YiB",
        }
    }
}

impl FromStr for SizeUnit {
    type Err = OctError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|u| u.name() == s)
            .ok_or_else(|| OctError::validation("unit", format!("unsupported size unit {s:?}")))
    }
}

impl fmt::Display for SizeUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Size of a partition: either a fixed amount, or the remaining space.
///
/// Fields are private so that an ambiguous size (no amount or unit,
/// and not taking the remaining space) cannot be constructed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PartitionSize {
    amount: Option<u64>,
    unit: Option<SizeUnit>,
    take_remaining: bool,
}

impl PartitionSize {
    pub fn new(
        amount: Option<u64>,
        unit: Option<SizeUnit>,
        take_remaining: bool,
    ) -> Result<Self, OctError> {
        if !take_remaining {
            if amount.is_none() {
                return Err(OctError::validation(
                    "amount",
                    "amount is required unless takeRemaining is true",
                ));
            }
            if unit.is_none() {
                return Err(OctError::validation(
                    "unit",
                    "unit is required unless takeRemaining is true",
                ));
            }
        }

        Ok(Self {
            amount,
            unit,
            take_remaining,
        })
    }

    #[cfg(test)]
    pub fn fixed(amount: u64, unit: SizeUnit) -> Self {
        Self {
            amount: Some(amount),
            unit: Some(unit),
            take_remaining: false,
        }
    }

    #[cfg(test)]
    pub fn remaining() -> Self {
        Self {
            amount: None,
            unit: None,
            take_remaining: true,
        }
    }

    pub fn amount(&self) -> Option<u64> {
        self.amount
    }

    pub fn unit(&self) -> Option<SizeUnit> {
        self.unit
    }

    pub fn take_remaining(&self) -> bool {
        self.take_remaining
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Partition {
    pub size: PartitionSize,
    pub file_system: Option<FileSystem>,
    pub partition_type: GptPartitionType,
    pub mount_point: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Drive {
    pub path: String,
    pub append: bool,
    pub partitions: Vec<Partition>,
}

impl TryFrom<&ManifestSize> for PartitionSize {
    type Error = OctError;

    fn try_from(size: &ManifestSize) -> Result<Self, Self::Error> {
        let amount = match size.amount {
            Some(n) if n < 1 => {
                return Err(OctError::validation(
                    "amount",
                    format!("amount must be at least 1, got {n}"),
                ))
            }
            Some(n) => Some(n as u64),
            None => None,
        };

        let unit = match &size.unit {
            Some(u) => Some(u.parse::<SizeUnit>()?),
            None => None,
        };

        PartitionSize::new(amount, unit, size.take_remaining)
    }
}

impl TryFrom<&ManifestPartition> for Partition {
    type Error = OctError;

    fn try_from(part: &ManifestPartition) -> Result<Self, Self::Error> {
        let size = PartitionSize::try_from(&part.size).map_err(|err| err.in_field("size"))?;

        let file_system = match &part.file_system {
            Some(fs) if fs.is_empty() => None,
            Some(fs) => Some(fs.parse::<FileSystem>()?),
            None => None,
        };

        let mount_point = match &part.mount_point {
            Some(mnt) if mnt.is_empty() => None,
            mnt => mnt.clone(),
        };

        Ok(Partition {
            size,
            file_system,
            partition_type: part.partition_type.parse()?,
            mount_point,
        })
    }
}

impl TryFrom<&ManifestDrive> for Drive {
    type Error = OctError;

    fn try_from(drive: &ManifestDrive) -> Result<Self, Self::Error> {
        let partitions = drive
            .partitions
            .iter()
            .enumerate()
            .map(|(i, part)| {
                Partition::try_from(part).map_err(|err| err.in_field(&format!("partitions[{i}]")))
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Drive {
            path: drive.path.clone(),
            append: drive.append,
            partitions,
        })
    }
}
