use crate::errors::OctError;
use crate::install::model::Drive;
use crate::install::validation;

pub(super) fn run(manifest_file: &str) -> Result<Vec<Drive>, OctError> {
    let start = std::time::Instant::now();

    let manifest = super::read_manifest(manifest_file)?;
    let drives = validation::validate(&manifest)?;

    let partitions: usize = drives.iter().map(|d| d.partitions.len()).sum();
    tracing::info!(
        drives = drives.len(),
        partitions,
        "validation done in {:?}",
        start.elapsed()
    );

    Ok(drives)
}
