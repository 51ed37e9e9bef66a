use crate::errors::OctError;
use crate::install::model::Partition;
use crate::linux::sfdisk::{DriveSnapshot, SnapshotPartition};

/// Returns the partitions in `after` that are not in `before`, in order.
///
/// Without a `before` snapshot (fresh table), every partition in `after`
/// is new. Otherwise sfdisk is expected to have only appended entries,
/// so `before` must be a node-wise prefix of `after`.
pub fn compute_new_partitions(
    before: Option<&DriveSnapshot>,
    after: &DriveSnapshot,
) -> Result<Vec<SnapshotPartition>, OctError> {
    let Some(before) = before else {
        return Ok(after.partitions.clone());
    };

    let mismatch = |reason: String| OctError::SnapshotMismatch {
        device: after.device.clone(),
        reason,
    };

    if before.partitions.len() > after.partitions.len() {
        return Err(mismatch(format!(
            "{} partitions before, only {} after",
            before.partitions.len(),
            after.partitions.len(),
        )));
    }

    for (i, (old, new)) in before.nodes().zip(after.nodes()).enumerate() {
        if old != new {
            return Err(mismatch(format!(
                "partition {} was {old}, is now {new}",
                i + 1
            )));
        }
    }

    Ok(after.partitions[before.partitions.len()..].to_vec())
}

/// Pairs requested partitions with created partition nodes by position.
///
/// Relies on sfdisk creating partitions in script order,
/// so the n-th new node belongs to the n-th script line.
pub fn map_logical_to_physical<'a>(
    logical: &'a [Partition],
    physical: Vec<SnapshotPartition>,
) -> Result<Vec<(&'a Partition, String)>, OctError> {
    if logical.len() != physical.len() {
        return Err(OctError::CountMismatch {
            requested: logical.len(),
            created: physical.len(),
        });
    }

    Ok(logical
        .iter()
        .zip(physical)
        .map(|(part, created)| (part, created.node))
        .collect())
}
