use std::collections::HashSet;

use super::{normalize_mountpoint, Validate};
use crate::errors::OctError;
use crate::install::model::{Drive, GptPartitionType};
use crate::install::Manifest;

/// Converts and validates all manifest drives, in manifest order.
///
/// On top of per-drive [`Validate`], checks the whole layout:
/// no duplicate drives, only the last partition of a drive may take
/// the remaining space, at most one root and one EFI partition,
/// and no two partitions mounted at the same place. Drives are
/// mounted in manifest order, so a mount point may not be nested
/// under a mount point of a later drive.
pub fn validate(manifest: &Manifest) -> Result<Vec<Drive>, OctError> {
    if manifest.drives.is_empty() {
        return Err(OctError::validation("drives", "no drives in manifest"));
    }

    let mut drives = Vec::with_capacity(manifest.drives.len());
    for (i, m_drive) in manifest.drives.iter().enumerate() {
        let prefix = format!("drives[{i}]");

        let drive = Drive::try_from(m_drive).map_err(|err| err.in_field(&prefix))?;
        drive.validate().map_err(|err| err.in_field(&prefix))?;

        drives.push(drive);
    }

    validate_layout(&drives)?;

    Ok(drives)
}

fn validate_layout(drives: &[Drive]) -> Result<(), OctError> {
    let mut paths = HashSet::new();
    let mut mounts = HashSet::new();
    let mut targets: Vec<(usize, String, String)> = Vec::new();
    let (mut has_root, mut has_efi) = (false, false);

    for (i, drive) in drives.iter().enumerate() {
        if !paths.insert(drive.path.as_str()) {
            return Err(OctError::validation(
                format!("drives[{i}].path"),
                format!("duplicate drive {}", drive.path),
            ));
        }

        if drive.partitions.is_empty() {
            return Err(OctError::validation(
                format!("drives[{i}].partitions"),
                format!("no partitions to create on {}", drive.path),
            ));
        }

        let last = drive.partitions.len() - 1;
        for (j, part) in drive.partitions.iter().enumerate() {
            let field = |name: &str| format!("drives[{i}].partitions[{j}].{name}");

            if part.size.take_remaining() && j != last {
                return Err(OctError::validation(
                    field("size"),
                    "only the last partition of a drive can take the remaining space",
                ));
            }

            let seen = match part.partition_type {
                GptPartitionType::Root => Some(&mut has_root),
                GptPartitionType::Efi => Some(&mut has_efi),
                _ => None,
            };

            if let Some(seen) = seen {
                if *seen {
                    return Err(OctError::validation(
                        field("partitionType"),
                        format!("more than one {} partition", part.partition_type),
                    ));
                }

                *seen = true;
            }

            let target = match part.partition_type {
                GptPartitionType::Swap => continue,
                GptPartitionType::Root => "/".to_string(),
                GptPartitionType::Efi => "/boot".to_string(),
                _ => match &part.mount_point {
                    Some(mnt) => normalize_mountpoint(mnt),
                    None => continue,
                },
            };

            if !mounts.insert(target.clone()) {
                return Err(OctError::validation(
                    field("mountPoint"),
                    format!("duplicate mount point {target}"),
                ));
            }

            targets.push((i, target, field("mountPoint")));
        }
    }

    for (i, target, field) in &targets {
        let parent = targets
            .iter()
            .find(|(j, parent, _)| j > i && is_nested(target, parent));

        if let Some((_, parent, _)) = parent {
            return Err(OctError::validation(
                field.as_str(),
                format!("{target} is nested under {parent}, which is on a later drive"),
            ));
        }
    }

    Ok(())
}

fn is_nested(target: &str, parent: &str) -> bool {
    match parent {
        "/" => target != "/",
        parent => target
            .strip_prefix(parent)
            .is_some_and(|rest| rest.starts_with('/')),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::install::{ManifestDrive, ManifestPartition, ManifestSize};

    fn part(
        size: Option<(i64, &str)>,
        fs: Option<&str>,
        t: &str,
        mnt: Option<&str>,
    ) -> ManifestPartition {
        ManifestPartition {
            size: match size {
                Some((amount, unit)) => ManifestSize {
                    amount: Some(amount),
                    unit: Some(unit.to_string()),
                    take_remaining: false,
                },
                None => ManifestSize {
                    take_remaining: true,
                    ..Default::default()
                },
            },
            file_system: fs.map(String::from),
            partition_type: t.to_string(),
            mount_point: mnt.map(String::from),
        }
    }

    fn drive(path: &str, partitions: Vec<ManifestPartition>) -> ManifestDrive {
        ManifestDrive {
            path: path.to_string(),
            append: false,
            partitions,
        }
    }

    #[test]
    fn test_validate_manifest() {
        struct Test {
            case: &'static str,
            manifest: Manifest,
            field: Option<&'static str>,
        }

        let tests = vec![
            Test {
                case: "efi, swap, root and data on two drives",
                manifest: Manifest {
                    drives: vec![
                        drive(
                            "/dev/sda",
                            vec![
                                part(Some((512, "MiB")), None, "EFI", None),
                                part(Some((4, "GiB")), None, "SWAP", None),
                                part(None, Some("ext4"), "ROOT", None),
                            ],
                        ),
                        drive(
                            "/dev/nvme0n1",
                            vec![part(None, Some("btrfs"), "GENERIC_FILESYSTEM", Some("/data"))],
                        ),
                    ],
                },
                field: None,
            },
            Test {
                case: "no drives",
                manifest: Manifest { drives: vec![] },
                field: Some("drives"),
            },
            Test {
                case: "drive without partitions",
                manifest: Manifest {
                    drives: vec![drive("/dev/sda", vec![])],
                },
                field: Some("drives[0].partitions"),
            },
            Test {
                case: "bad drive path",
                manifest: Manifest {
                    drives: vec![drive("sda", vec![part(None, Some("ext4"), "ROOT", None)])],
                },
                field: Some("drives[0].path"),
            },
            Test {
                case: "bad unit on second drive",
                manifest: Manifest {
                    drives: vec![
                        drive("/dev/sda", vec![part(None, Some("ext4"), "ROOT", None)]),
                        drive(
                            "/dev/sdb",
                            vec![part(Some((1, "TB")), Some("ext4"), "HOME", Some("/home"))],
                        ),
                    ],
                },
                field: Some("drives[1].partitions[0].size.unit"),
            },
            Test {
                case: "duplicate drive",
                manifest: Manifest {
                    drives: vec![
                        drive("/dev/sda", vec![part(None, Some("ext4"), "ROOT", None)]),
                        drive(
                            "/dev/sda",
                            vec![part(None, Some("ext4"), "HOME", Some("/home"))],
                        ),
                    ],
                },
                field: Some("drives[1].path"),
            },
            Test {
                case: "remaining space not last",
                manifest: Manifest {
                    drives: vec![drive(
                        "/dev/sda",
                        vec![
                            part(None, Some("ext4"), "ROOT", None),
                            part(Some((4, "GiB")), None, "SWAP", None),
                        ],
                    )],
                },
                field: Some("drives[0].partitions[0].size"),
            },
            Test {
                case: "two roots",
                manifest: Manifest {
                    drives: vec![
                        drive("/dev/sda", vec![part(None, Some("ext4"), "ROOT", None)]),
                        drive("/dev/sdb", vec![part(None, Some("btrfs"), "ROOT", None)]),
                    ],
                },
                field: Some("drives[1].partitions[0].partitionType"),
            },
            Test {
                case: "two efi partitions",
                manifest: Manifest {
                    drives: vec![drive(
                        "/dev/sda",
                        vec![
                            part(Some((512, "MiB")), None, "EFI", None),
                            part(Some((512, "MiB")), None, "EFI", None),
                        ],
                    )],
                },
                field: Some("drives[0].partitions[1].partitionType"),
            },
            Test {
                case: "generic filesystem mounted at /boot",
                manifest: Manifest {
                    drives: vec![drive(
                        "/dev/sda",
                        vec![
                            part(Some((512, "MiB")), None, "EFI", None),
                            part(None, Some("ext4"), "GENERIC_FILESYSTEM", Some("/boot/")),
                        ],
                    )],
                },
                field: Some("drives[0].partitions[1].mountPoint"),
            },
            Test {
                case: "duplicate home mounts across drives",
                manifest: Manifest {
                    drives: vec![
                        drive(
                            "/dev/sda",
                            vec![part(None, Some("ext4"), "HOME", Some("/home"))],
                        ),
                        drive(
                            "/dev/sdb",
                            vec![part(None, Some("btrfs"), "GENERIC_FILESYSTEM", Some("/home"))],
                        ),
                    ],
                },
                field: Some("drives[1].partitions[0].mountPoint"),
            },
            Test {
                case: "duplicate mounts spelled with repeated slashes",
                manifest: Manifest {
                    drives: vec![drive(
                        "/dev/sda",
                        vec![
                            part(Some((8, "GiB")), Some("ext4"), "HOME", Some("/home")),
                            part(None, Some("ext4"), "GENERIC_FILESYSTEM", Some("//home/")),
                        ],
                    )],
                },
                field: Some("drives[0].partitions[1].mountPoint"),
            },
            Test {
                case: "mount point outside the install root",
                manifest: Manifest {
                    drives: vec![drive(
                        "/dev/sda",
                        vec![
                            part(Some((32, "GiB")), Some("ext4"), "ROOT", None),
                            part(None, Some("ext4"), "GENERIC_FILESYSTEM", Some("/../etc")),
                        ],
                    )],
                },
                field: Some("drives[0].partitions[1].mountPoint"),
            },
        ];

        for test in tests {
            match (test.field, validate(&test.manifest)) {
                (None, Ok(drives)) => assert_eq!(drives.len(), test.manifest.drives.len()),
                (Some(expected), Err(OctError::Validation { field, .. })) => {
                    assert_eq!(field, expected, "case {}", test.case)
                }
                (expected, result) => {
                    panic!("case {}: expected {expected:?}, got {result:?}", test.case)
                }
            }
        }
    }

    #[test]
    fn test_nested_mounts_across_drives() {
        let home_first = Manifest {
            drives: vec![
                drive("/dev/sdb", vec![part(None, Some("ext4"), "HOME", Some("/home"))]),
                drive("/dev/sda", vec![part(None, Some("ext4"), "ROOT", None)]),
            ],
        };

        match validate(&home_first) {
            Err(OctError::Validation { field, .. }) => {
                assert_eq!(field, "drives[0].partitions[0].mountPoint")
            }
            result => panic!("unexpected result {result:?}"),
        }

        let root_first = Manifest {
            drives: home_first.drives.iter().rev().cloned().collect(),
        };

        validate(&root_first).expect("root drive first should be valid");
    }

    #[test]
    fn test_is_nested() {
        assert!(is_nested("/boot", "/"));
        assert!(is_nested("/home/user", "/home"));
        assert!(!is_nested("/", "/"));
        assert!(!is_nested("/homes", "/home"));
        assert!(!is_nested("/home", "/home"));
    }
}
