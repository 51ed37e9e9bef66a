use crate::entity::action::{Action, ActionChroot};
use crate::entity::report::Report;
use crate::entity::stage::StageActions;
use crate::errors::OctError;
use crate::linux::archchroot;
use crate::utils::shell::Runner;

/// Runs `command` inside the system mounted at `location`
pub(super) fn run(runner: &dyn Runner, location: &str, command: &str) -> Result<Report, OctError> {
    let start = std::time::Instant::now();
    let action_chroot = ActionChroot::ArchChrootCmd(command.to_string());

    if let Err(err) = arch_chroot(runner, location, command) {
        return Err(OctError::ApplyError {
            error: Box::new(err),
            action_failed: Box::new(Action::Chroot(action_chroot)),
            actions_performed: vec![],
        });
    }

    Ok(Report {
        location: location.to_string(),
        summary: Box::new(StageActions {
            chroot: vec![action_chroot],
            ..Default::default()
        }),
        duration: start.elapsed(),
    })
}

fn arch_chroot(runner: &dyn Runner, location: &str, command: &str) -> Result<(), OctError> {
    let cmd = archchroot::cmd_arch_chroot(location, command);

    let output = runner.run(&cmd).map_err(|err| OctError::CmdFailed {
        error: Some(err),
        context: format!("failed to run `{cmd}`"),
    })?;

    if !output.success() {
        return Err(OctError::ChrootFailed {
            command: command.to_string(),
            stderr: output.error_text(),
        });
    }

    tracing::info!(location, command, "arch-chroot done");

    Ok(())
}
