use crate::entity::action::ActionDrive;
use crate::errors::OctError;
use crate::install::model::Drive;
use crate::linux::sfdisk::{self, DriveSnapshot};
use crate::utils::fs::temp_file_with_content;
use crate::utils::shell::Runner;

use super::compat;
use super::diff;
use super::fs::{mount_target, Provisioning};
use super::map_err::map_err_drives;

/// Partitions, formats and mounts every drive, in manifest order.
///
/// All drives are checked for GPT before any drive is touched.
/// Drives that were already applied are not rolled back
/// if a later drive fails.
pub fn apply_drives(
    runner: &dyn Runner,
    drives: &[Drive],
    location: &str,
) -> Result<Vec<ActionDrive>, OctError> {
    let mut actions = compat::check_drives(runner, drives)?;

    for drive in drives {
        let action_apply_drive = ActionDrive::ApplyDrive {
            device: drive.path.clone(),
        };

        match apply_drive(runner, drive, location) {
            Err(err) => {
                return Err(map_err_drives(err, action_apply_drive, actions));
            }
            Ok(drive_actions) => {
                actions.extend(drive_actions);
                actions.push(action_apply_drive);
            }
        }
    }

    actions.push(ActionDrive::ApplyDrives);

    Ok(actions)
}

/// Creates the partitions of `drive` with sfdisk, finds the nodes sfdisk
/// created, then formats and mounts each node according to its partition.
pub fn apply_drive(
    runner: &dyn Runner,
    drive: &Drive,
    location: &str,
) -> Result<Vec<ActionDrive>, OctError> {
    let mut actions = Vec::new();
    let action_snapshot = ActionDrive::SnapshotDrive {
        device: drive.path.clone(),
    };

    // A fresh table replaces everything, so there is nothing to diff against
    let before = match drive.append {
        false => None,
        true => match snapshot(runner, &drive.path) {
            Err(err) => return Err(map_err_drives(err, action_snapshot, actions)),
            Ok(before) => {
                actions.push(action_snapshot.clone());
                Some(before)
            }
        },
    };

    let script = sfdisk::render_script(&drive.partitions);
    let action_create = ActionDrive::CreatePartitions {
        device: drive.path.clone(),
        append: drive.append,
        script: script.clone(),
    };

    if let Err(err) = create_partitions(runner, drive, &script) {
        return Err(map_err_drives(err, action_create, actions));
    }

    actions.push(action_create);
    tracing::info!(device = %drive.path, append = drive.append, "created partitions");

    let after = match snapshot(runner, &drive.path) {
        Err(err) => return Err(map_err_drives(err, action_snapshot, actions)),
        Ok(after) => after,
    };

    actions.push(action_snapshot);

    let mapped = diff::compute_new_partitions(before.as_ref(), &after)
        .and_then(|created| diff::map_logical_to_physical(&drive.partitions, created));

    let requested = drive.partitions.len();
    let created = after
        .partitions
        .len()
        .saturating_sub(before.as_ref().map_or(0, |b| b.partitions.len()));
    let action_map = ActionDrive::MapPartitions {
        device: drive.path.clone(),
        requested,
        created,
    };

    let pairs = match mapped {
        Err(err) => return Err(map_err_drives(err, action_map, actions)),
        Ok(pairs) => pairs,
    };

    actions.push(action_map);

    let mut provisions = Vec::with_capacity(pairs.len());
    for (partition, node) in pairs {
        tracing::info!(
            device = %drive.path,
            node = %node,
            partition_type = %partition.partition_type,
            "mapped partition"
        );

        actions.push(ActionDrive::MapPartition {
            node: node.clone(),
            partition_type: partition.partition_type,
        });

        provisions.push(Provisioning::new(partition, node, location));
    }

    for provision in provisions.iter_mut() {
        match provision.format(runner) {
            Err(err) => {
                let action_failed = provision
                    .format_action()
                    .unwrap_or_else(|_| map_action(provision));
                return Err(map_err_drives(err, action_failed, actions));
            }
            Ok(action) => actions.push(action),
        }
    }

    // Parents before children, so that a mount is never shadowed
    // by a later mount on its parent directory
    provisions.sort_by_key(|p| mount_depth(p, location));

    for provision in provisions.iter_mut() {
        match provision.activate(runner) {
            Err(err) => {
                let action_failed = provision
                    .activate_action()
                    .unwrap_or_else(|_| map_action(provision));
                return Err(map_err_drives(err, action_failed, actions));
            }
            Ok(action) => actions.push(action),
        }
    }

    Ok(actions)
}

/// Captures the current partition table of `device` with `sfdisk --json`
pub fn snapshot(runner: &dyn Runner, device: &str) -> Result<DriveSnapshot, OctError> {
    let partitioning_err = |context: &str, stderr: String| OctError::Partitioning {
        device: device.to_string(),
        context: context.to_string(),
        stderr,
    };

    let output = runner
        .run(&sfdisk::cmd_dump(device))
        .map_err(|err| partitioning_err("failed to run sfdisk --json", err.to_string()))?;

    if !output.success() {
        return Err(partitioning_err("failed to read partition table", output.error_text()));
    }

    let snapshot = sfdisk::parse_dump(&output.stdout)
        .map_err(|err| partitioning_err("bad sfdisk --json output", err.to_string()))?;

    tracing::debug!(device, partitions = snapshot.partitions.len(), "took drive snapshot");

    Ok(snapshot)
}

/// Feeds `script` to sfdisk through a temp file,
/// which is removed once sfdisk returns.
fn create_partitions(runner: &dyn Runner, drive: &Drive, script: &str) -> Result<(), OctError> {
    let suffix = format!("-{}.sfdisk", drive.path.trim_start_matches("/dev/").replace('/', "-"));
    let script_file = temp_file_with_content(&suffix, script)?;

    let cmd = sfdisk::cmd_apply(&drive.path, drive.append, script_file.path());

    let partitioning_err = |stderr: String| OctError::Partitioning {
        device: drive.path.clone(),
        context: format!("`{cmd}` failed"),
        stderr,
    };

    let output = runner.run(&cmd).map_err(|err| partitioning_err(err.to_string()))?;
    if !output.success() {
        return Err(partitioning_err(output.error_text()));
    }

    Ok(())
}

fn mount_depth(provision: &Provisioning, location: &str) -> usize {
    match mount_target(location, provision.partition()) {
        Ok(Some(target)) => target.split('/').filter(|c| !c.is_empty()).count(),
        _ => usize::MAX,
    }
}

fn map_action(provision: &Provisioning) -> ActionDrive {
    ActionDrive::MapPartition {
        node: provision.node().to_string(),
        partition_type: provision.partition().partition_type,
    }
}
