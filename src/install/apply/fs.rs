use crate::constants::ESP_MOUNTPOINT;
use crate::entity::action::ActionDrive;
use crate::errors::OctError;
use crate::install::model::{GptPartitionType, Partition};
use crate::install::validation::normalize_mountpoint;
use crate::linux::{mkfs, mount};
use crate::utils::shell::{Cmd, Runner};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PartitionState {
    Planned,
    Formatted,
    Mounted,
}

/// A created partition on its way from [`PartitionState::Planned`]
/// to [`PartitionState::Mounted`]. Transitions only go forward.
///
/// | type | format | activate |
/// |---|---|---|
/// | EFI | `mkfs.fat -F 32` | `mount --mkdir` on `{location}/boot` |
/// | SWAP | `mkswap` | `swapon` |
/// | ROOT | per fileSystem | `mount` on `{location}` |
/// | HOME, GENERIC_FILESYSTEM | per fileSystem | `mount --mkdir` on `{location}{mountPoint}` |
#[derive(Debug)]
pub struct Provisioning<'a> {
    partition: &'a Partition,
    node: String,
    location: &'a str,
    state: PartitionState,
}

impl<'a> Provisioning<'a> {
    pub fn new(partition: &'a Partition, node: String, location: &'a str) -> Self {
        Self {
            partition,
            node,
            location,
            state: PartitionState::Planned,
        }
    }

    pub fn partition(&self) -> &'a Partition {
        self.partition
    }

    pub fn node(&self) -> &str {
        &self.node
    }

    pub fn format_cmd(&self) -> Result<Cmd, OctError> {
        format_cmd(self.partition, &self.node)
    }

    pub fn activate_cmd(&self) -> Result<Cmd, OctError> {
        let target = mount_target(self.location, self.partition)?;

        Ok(match (self.partition.partition_type, target) {
            (GptPartitionType::Swap, _) => mount::cmd_swapon(&self.node),
            (GptPartitionType::Root, Some(target)) => mount::cmd_mount(&self.node, &target, false),
            (_, Some(target)) => mount::cmd_mount(&self.node, &target, true),
            (t, None) => {
                return Err(OctError::OctoberBug(format!(
                    "no mount target for {t} partition"
                )))
            }
        })
    }

    pub fn format_action(&self) -> Result<ActionDrive, OctError> {
        Ok(match self.partition.partition_type {
            GptPartitionType::Swap => ActionDrive::CreateSwap {
                device: self.node.clone(),
            },
            GptPartitionType::Efi => ActionDrive::CreateFs {
                device: self.node.clone(),
                fs_type: "vfat".to_string(),
            },
            t => match self.partition.file_system {
                Some(fs) => ActionDrive::create_fs(&self.node, fs),
                None => return Err(missing_fs(t)),
            },
        })
    }

    pub fn activate_action(&self) -> Result<ActionDrive, OctError> {
        match mount_target(self.location, self.partition)? {
            None => Ok(ActionDrive::SwapOn {
                device: self.node.clone(),
            }),
            Some(dst) => Ok(ActionDrive::MountFs {
                src: self.node.clone(),
                dst,
            }),
        }
    }

    /// Planned -> Formatted
    pub fn format(&mut self, runner: &dyn Runner) -> Result<ActionDrive, OctError> {
        self.expect_state(PartitionState::Planned, "format")?;

        let action = self.format_action()?;
        let cmd = self.format_cmd()?;

        let format_err = |stderr: String| OctError::Format {
            node: self.node.clone(),
            stderr,
        };

        let output = runner.run(&cmd).map_err(|err| format_err(err.to_string()))?;
        if !output.success() {
            return Err(format_err(output.error_text()));
        }

        tracing::info!(node = %self.node, cmd = %cmd, "formatted partition");
        self.state = PartitionState::Formatted;

        Ok(action)
    }

    /// Formatted -> Mounted. Swap partitions are activated instead of mounted.
    pub fn activate(&mut self, runner: &dyn Runner) -> Result<ActionDrive, OctError> {
        self.expect_state(PartitionState::Formatted, "mount")?;

        let action = self.activate_action()?;
        let cmd = self.activate_cmd()?;

        let target = match &action {
            ActionDrive::MountFs { dst, .. } => dst.clone(),
            _ => "swap".to_string(),
        };

        let mount_err = |stderr: String| OctError::Mount {
            node: self.node.clone(),
            target: target.clone(),
            stderr,
        };

        let output = runner.run(&cmd).map_err(|err| mount_err(err.to_string()))?;
        if !output.success() {
            return Err(mount_err(output.error_text()));
        }

        tracing::info!(node = %self.node, target = %target, "activated partition");
        self.state = PartitionState::Mounted;

        Ok(action)
    }

    fn expect_state(&self, expected: PartitionState, op: &str) -> Result<(), OctError> {
        if self.state != expected {
            return Err(OctError::OctoberBug(format!(
                "cannot {op} {} in state {:?}",
                self.node, self.state
            )));
        }

        Ok(())
    }
}

pub fn format_cmd(partition: &Partition, node: &str) -> Result<Cmd, OctError> {
    match (partition.partition_type, partition.file_system) {
        (GptPartitionType::Efi, _) => Ok(mkfs::cmd_fat32(node)),
        (GptPartitionType::Swap, _) => Ok(mkfs::cmd_mkswap(node)),
        (_, Some(fs)) => Ok(mkfs::cmd_mkfs(fs, node)),
        (t, None) => Err(missing_fs(t)),
    }
}

/// Where `partition` is mounted under `location`, or None for swap
pub fn mount_target(location: &str, partition: &Partition) -> Result<Option<String>, OctError> {
    let location = match location.trim_end_matches('/') {
        "" => "/",
        loc => loc,
    };

    match partition.partition_type {
        GptPartitionType::Swap => Ok(None),
        GptPartitionType::Root => Ok(Some(location.to_string())),
        GptPartitionType::Efi => Ok(Some(prepend_base(location, ESP_MOUNTPOINT))),
        t => match &partition.mount_point {
            Some(mnt) => Ok(Some(prepend_base(location, &normalize_mountpoint(mnt)))),
            None => Err(OctError::OctoberBug(format!(
                "{t} partition has no mount point"
            ))),
        },
    }
}

// e.g. base /mnt on mountpoint /home => /mnt/home
fn prepend_base(base: &str, mountpoint: &str) -> String {
    match base {
        "/" => mountpoint.to_string(),
        base => format!("{base}{mountpoint}"),
    }
}

fn missing_fs(t: GptPartitionType) -> OctError {
    OctError::OctoberBug(format!("{t} partition has no filesystem"))
}
