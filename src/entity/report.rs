use serde::{Deserialize, Serialize};
use serde_json::json;

use super::stage::StageActions;
use crate::install::model::{FileSystem, GptPartitionType};

/// Summary of a successful `apply`
#[derive(Debug)]
pub struct Report {
    pub location: String,
    pub summary: Box<StageActions>,
    pub duration: std::time::Duration,
}

impl Report {
    pub fn to_json(&self) -> serde_json::Value {
        json!({
            "location": self.location,
            "summary": self.summary,
            "elapsedTime": self.duration,
        })
    }

    pub fn to_json_string(&self) -> String {
        self.to_json().to_string()
    }
}

/// What `apply` would do, printed by dry runs
#[derive(Debug, Serialize, Deserialize)]
pub struct Plan {
    pub location: String,
    pub drives: Vec<DrivePlan>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct DrivePlan {
    pub device: String,
    pub append: bool,
    pub script: String,
    pub partitions: Vec<PartitionPlan>,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PartitionPlan {
    pub partition_type: GptPartitionType,
    pub file_system: Option<FileSystem>,
    pub format: String,

    /// None for swap, which is activated instead of mounted
    pub mountpoint: Option<String>,
}

impl Plan {
    pub fn to_json_string(&self) -> String {
        json!(self).to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entity::action::ActionDrive;

    #[test]
    fn test_report_json() {
        let report = Report {
            location: "/mnt".into(),
            summary: Box::new(StageActions {
                drives: vec![
                    ActionDrive::ApplyDrive {
                        device: "/dev/sda".into(),
                    },
                    ActionDrive::ApplyDrives,
                ],
                chroot: vec![],
            }),
            duration: std::time::Duration::from_secs(20),
        };

        let json = report.to_json();
        assert_eq!(json["location"], "/mnt");
        assert_eq!(json["summary"]["stage-drives"][1], "applyDrives");
        assert!(json["summary"].get("stage-chroot").is_none());
        assert_eq!(json["elapsedTime"]["secs"], 20);
    }

    #[test]
    fn test_plan_json() {
        let plan = Plan {
            location: "/mnt".into(),
            drives: vec![DrivePlan {
                device: "/dev/sda".into(),
                append: false,
                script: "type=0657FD6D-A4AB-43C4-84E5-0933C84B4F4F, size=4GiB\n".into(),
                partitions: vec![PartitionPlan {
                    partition_type: GptPartitionType::Swap,
                    file_system: None,
                    format: "mkswap".into(),
                    mountpoint: None,
                }],
            }],
        };

        let json: serde_json::Value = serde_json::from_str(&plan.to_json_string()).unwrap();
        assert_eq!(json["drives"][0]["partitions"][0]["partitionType"], "SWAP");
        assert_eq!(json["drives"][0]["partitions"][0]["format"], "mkswap");
    }
}
