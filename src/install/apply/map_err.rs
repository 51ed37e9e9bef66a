use crate::entity::action::{Action, ActionDrive};
use crate::errors::OctError;

pub(super) fn map_err_drives(
    err: OctError,
    action_failed: ActionDrive,
    actions_performed: Vec<ActionDrive>,
) -> OctError {
    OctError::ApplyError {
        error: Box::new(err),
        action_failed: Box::new(Action::Drives(action_failed)),
        actions_performed: actions_performed
            .into_iter()
            .map(Action::Drives)
            .collect(),
    }
}
