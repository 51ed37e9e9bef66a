mod manifest;

pub use self::manifest::validate;

use super::model::{Drive, Partition, PartitionSize};
use crate::errors::OctError;

/// Structural checks on a value. Pure, and returns the first violation
/// as [`OctError::Validation`] naming the offending field.
pub trait Validate {
    fn validate(&self) -> Result<(), OctError>;
}

impl Validate for PartitionSize {
    fn validate(&self) -> Result<(), OctError> {
        if !self.take_remaining() {
            if self.amount().is_none() {
                return Err(OctError::validation(
                    "amount",
                    "amount is required unless takeRemaining is true",
                ));
            }

            if self.unit().is_none() {
                return Err(OctError::validation(
                    "unit",
                    "unit is required unless takeRemaining is true",
                ));
            }
        }

        match self.amount() {
            Some(0) => Err(OctError::validation("amount", "amount must be at least 1")),
            _ => Ok(()),
        }
    }
}

impl Validate for Partition {
    fn validate(&self) -> Result<(), OctError> {
        self.size.validate().map_err(|err| err.in_field("size"))?;

        if let Some(mnt) = &self.mount_point {
            if !mnt.starts_with('/') {
                return Err(OctError::validation(
                    "mountPoint",
                    format!("mount point {mnt} is not an absolute path"),
                ));
            }

            if mnt.split('/').any(|c| c == "." || c == "..") {
                return Err(OctError::validation(
                    "mountPoint",
                    format!("mount point {mnt} contains . or .. components"),
                ));
            }
        }

        if self.file_system.is_none() && self.partition_type.needs_file_system() {
            return Err(OctError::validation(
                "fileSystem",
                format!(
                    "partition type {} requires a filesystem",
                    self.partition_type
                ),
            ));
        }

        if self.mount_point.is_none() && !self.partition_type.has_fixed_mount() {
            return Err(OctError::validation(
                "mountPoint",
                format!(
                    "partition type {} requires a mount point",
                    self.partition_type
                ),
            ));
        }

        Ok(())
    }
}

impl Validate for Drive {
    fn validate(&self) -> Result<(), OctError> {
        if !self.path.starts_with("/dev/") || self.path.len() == "/dev/".len() {
            return Err(OctError::validation(
                "path",
                format!("drive path {:?} is not a device path under /dev/", self.path),
            ));
        }

        for (i, part) in self.partitions.iter().enumerate() {
            part.validate()
                .map_err(|err| err.in_field(&format!("partitions[{i}]")))?;
        }

        Ok(())
    }
}

/// Collapses repeated and trailing slashes, e.g. `//srv//data/` -> `/srv/data`.
/// Expects a validated absolute mount point.
pub(crate) fn normalize_mountpoint(mountpoint: &str) -> String {
    let components: Vec<&str> = mountpoint.split('/').filter(|c| !c.is_empty()).collect();

    format!("/{}", components.join("/"))
}
