use serde::{Deserialize, Serialize};

use super::action::*;

#[derive(Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct StageActions {
    #[serde(rename = "stage-drives")]
    #[serde(skip_serializing_if = "Vec::is_empty", default)]
    pub drives: Vec<ActionDrive>,

    #[serde(rename = "stage-chroot")]
    #[serde(skip_serializing_if = "Vec::is_empty", default)]
    pub chroot: Vec<ActionChroot>,
}

impl From<Vec<Action>> for StageActions {
    fn from(value: Vec<Action>) -> Self {
        let mut s = Self::default();

        for v in value {
            match v {
                Action::Drives(action) => s.drives.push(action),
                Action::Chroot(action) => s.chroot.push(action),
            }
        }

        s
    }
}

#[test]
fn test_from_actions() {
    let stages = StageActions::from(vec![
        Action::Drives(ActionDrive::ApplyDrive {
            device: "/dev/sda".into(),
        }),
        Action::Chroot(ActionChroot::ArchChrootCmd("locale-gen".into())),
        Action::Drives(ActionDrive::ApplyDrives),
    ]);

    assert_eq!(
        stages.drives,
        vec![
            ActionDrive::ApplyDrive {
                device: "/dev/sda".into()
            },
            ActionDrive::ApplyDrives,
        ]
    );
    assert_eq!(stages.chroot.len(), 1);
}
