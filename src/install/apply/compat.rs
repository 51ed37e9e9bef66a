use crate::entity::action::ActionDrive;
use crate::errors::{OctError, TableCause};
use crate::install::model::Drive;
use crate::linux::blkid;
use crate::utils::shell::Runner;

use super::map_err::map_err_drives;

// blkid exits with 2 if the requested tag was not found
const BLKID_NOT_FOUND: i32 = 2;

/// Checks all drives before any of them is modified.
/// A single non-GPT drive fails the whole batch.
pub fn check_drives(
    runner: &dyn Runner,
    drives: &[Drive],
) -> Result<Vec<ActionDrive>, OctError> {
    let mut actions = Vec::new();

    for drive in drives {
        let action_check = ActionDrive::CheckPartitionTable {
            device: drive.path.clone(),
        };

        if let Err(err) = check_compatible(runner, drive) {
            return Err(map_err_drives(err, action_check, actions));
        }

        actions.push(action_check);
    }

    Ok(actions)
}

/// Succeeds only if blkid reports the drive's partition table as `gpt`.
///
/// This also applies to drives that get a fresh table, because
/// creating GPT over another table type is not supported.
pub fn check_compatible(runner: &dyn Runner, drive: &Drive) -> Result<(), OctError> {
    let incompatible = |cause| OctError::IncompatibleTable {
        device: drive.path.clone(),
        cause,
    };

    let output = runner
        .run(&blkid::cmd_table_type(&drive.path))
        .map_err(|err| incompatible(TableCause::Query(err.to_string())))?;

    if !output.success() {
        if output.status == Some(BLKID_NOT_FOUND) && output.stderr.trim().is_empty() {
            return Err(incompatible(TableCause::NoTable));
        }

        return Err(incompatible(TableCause::Query(output.error_text())));
    }

    match blkid::parse_table_type(&output.stdout) {
        Some(table) if table == "gpt" => {
            tracing::debug!(device = %drive.path, "partition table is gpt");
            Ok(())
        }
        Some(table) => Err(incompatible(TableCause::NotGpt(table))),
        None => Err(incompatible(TableCause::NoTable)),
    }
}
