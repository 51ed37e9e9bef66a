pub mod apply;
pub mod model;
pub mod validation;

use serde::{Deserialize, Serialize};

use crate::errors::OctError;

/// Installation manifest as written by users.
///
/// Only the drive layout is read here. Other installer sections
/// (users, locale, mirrors, ...) are ignored so that a full installation
/// document can be fed as is.
#[derive(Debug, PartialEq, Clone, Serialize, Deserialize)]
pub struct Manifest {
    #[serde(alias = "disks")]
    pub drives: Vec<ManifestDrive>,
}

impl Manifest {
    /// Parses JSON or YAML manifest text
    #[inline]
    pub fn from_yaml(manifest_yaml: &str) -> Result<Self, OctError> {
        parse(manifest_yaml)
    }
}

#[derive(Debug, PartialEq, Clone, Serialize, Deserialize)]
pub struct ManifestDrive {
    #[serde(alias = "device")]
    pub path: String,

    #[serde(default)]
    pub append: bool,

    pub partitions: Vec<ManifestPartition>,
}

#[derive(Debug, PartialEq, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ManifestPartition {
    pub size: ManifestSize,

    #[serde(default, alias = "file_system", alias = "fs")]
    pub file_system: Option<String>,

    #[serde(alias = "partition_type", alias = "type")]
    pub partition_type: String,

    #[serde(default, alias = "mount_point", alias = "mnt")]
    pub mount_point: Option<String>,
}

// amount is signed so that bad values reach validation
// instead of failing in the YAML parser
#[derive(Debug, PartialEq, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ManifestSize {
    #[serde(default)]
    pub amount: Option<i64>,

    #[serde(default)]
    pub unit: Option<String>,

    #[serde(default, alias = "take_remaining", alias = "remaining")]
    pub take_remaining: bool,
}

#[inline]
pub fn parse(manifest: &str) -> Result<Manifest, OctError> {
    serde_yaml::from_str(manifest).map_err(|err| OctError::BadManifest(err.to_string()))
}
