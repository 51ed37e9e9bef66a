mod compat;
mod diff;
mod drives;
mod fs;
mod map_err;

use crate::entity::report::{DrivePlan, PartitionPlan, Plan};
use crate::entity::stage::StageActions;
use crate::errors::OctError;
use crate::install::model::Drive;
use crate::linux::sfdisk;
use crate::utils::shell::Runner;

/// Partitions, formats and mounts `drives` under `install_location`,
/// and maps `OctError::ApplyError` to `OctError::InstallError`
pub fn apply_manifest(
    runner: &dyn Runner,
    drives: &[Drive],
    install_location: &str,
) -> Result<Box<StageActions>, OctError> {
    let mut progress: Box<StageActions> = Box::default();

    tracing::info!(drives = drives.len(), location = install_location, "stage drives");

    match drives::apply_drives(runner, drives, install_location) {
        Err(err) => Err(OctError::InstallError {
            error: Box::new(err),
            stages_performed: progress,
        }),
        Ok(actions) => {
            progress.drives.extend(actions);
            Ok(progress)
        }
    }
}

/// Describes what [`apply_manifest`] would run, without running anything
pub fn plan(drives: &[Drive], install_location: &str) -> Result<Plan, OctError> {
    let mut plans = Vec::with_capacity(drives.len());

    for drive in drives {
        let partitions = drive
            .partitions
            .iter()
            .map(|part| -> Result<PartitionPlan, OctError> {
                Ok(PartitionPlan {
                    partition_type: part.partition_type,
                    file_system: part.file_system,
                    format: fs::format_cmd(part, &drive.path)?.program,
                    mountpoint: fs::mount_target(install_location, part)?,
                })
            })
            .collect::<Result<Vec<_>, _>>()?;

        plans.push(DrivePlan {
            device: drive.path.clone(),
            append: drive.append,
            script: sfdisk::render_script(&drive.partitions),
            partitions,
        });
    }

    Ok(Plan {
        location: install_location.to_string(),
        drives: plans,
    })
}
