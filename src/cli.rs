use clap::{Parser, Subcommand};

use crate::constants::defaults;
use crate::errors::OctError;

#[derive(Debug, Parser)]
#[clap(
    author = "october-rs",
    version,
    about = "GPT partitioning for the October installer"
)]
pub struct Cli {
    #[command(subcommand)]
    pub commands: Option<Commands>,

    /// Installation manifest file (JSON or YAML)
    #[arg(
        global = true,
        short = 'f',
        long = "file",
        value_parser = validate_filename,
        default_value_t = String::from(defaults::MANIFEST_FILE)
    )]
    pub manifest: String,

    /// Dry-run, october-rs will not touch any drives,
    /// and will just print the partitioning plan
    #[arg(global = true, short = 'n', default_value_t = false)]
    pub dry_run: bool,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Validate the manifest drive layout (default)
    Validate,

    /// Partition, format and mount drives from the manifest
    Apply,

    /// Run a command inside the mounted installation with arch-chroot
    Chroot {
        /// Command line, passed to the chroot shell as is
        #[arg(required = true, trailing_var_arg = true, allow_hyphen_values = true)]
        cmd: Vec<String>,
    },
}

fn validate_filename(name: &str) -> Result<String, OctError> {
    if name.is_empty() {
        return Err(OctError::BadArgs(String::from("empty filename")));
    }

    Ok(name.to_string())
}
