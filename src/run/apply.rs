use std::collections::BTreeSet;

use crate::constants::REQUIRED_COMMANDS;
use crate::entity::report::{Plan, Report};
use crate::errors::OctError;
use crate::install::apply;
use crate::install::model::Drive;
use crate::utils::fs::file_exists;
use crate::utils::shell::{self, Runner};

pub(super) fn run(
    runner: &dyn Runner,
    manifest_file: &str,
    location: &str,
) -> Result<Report, OctError> {
    let start = std::time::Instant::now();

    let drives = super::validate::run(manifest_file)?;
    let plan = apply::plan(&drives, location)?;

    preflight(&drives, &plan, shell::in_path)?;

    let stages = apply::apply_manifest(runner, &drives, location)?;

    Ok(Report {
        location: location.to_string(),
        summary: stages,
        duration: start.elapsed(),
    })
}

pub(super) fn plan(manifest_file: &str, location: &str) -> Result<Plan, OctError> {
    let drives = super::validate::run(manifest_file)?;

    apply::plan(&drives, location)
}

/// Fails if a program needed by `plan` is missing from PATH,
/// or if a drive does not exist
fn preflight<F>(drives: &[Drive], plan: &Plan, in_path: F) -> Result<(), OctError>
where
    F: Fn(&str) -> bool,
{
    let missing: Vec<&str> = required_commands(plan)
        .into_iter()
        .filter(|program| !in_path(program))
        .collect();

    if !missing.is_empty() {
        return Err(OctError::CmdFailed {
            error: None,
            context: format!("missing required commands: {}", missing.join(", ")),
        });
    }

    for (i, drive) in drives.iter().enumerate() {
        if !file_exists(&drive.path) {
            return Err(OctError::validation(
                format!("drives[{i}].path"),
                format!("no such device {}", drive.path),
            ));
        }
    }

    Ok(())
}

fn required_commands(plan: &Plan) -> BTreeSet<&str> {
    let mut programs: BTreeSet<&str> = REQUIRED_COMMANDS.into_iter().collect();

    for part in plan.drives.iter().flat_map(|d| d.partitions.iter()) {
        programs.insert(part.format.as_str());

        if part.mountpoint.is_none() {
            programs.insert("swapon");
        }
    }

    programs
}
