pub mod apply;
pub mod chroot;
pub mod validate;

use std::env;

use colored::Colorize;
use nix::unistd::Uid;

use crate::constants::defaults;
use crate::errors::OctError;
use crate::install::Manifest;
use crate::linux::archchroot;
use crate::utils::shell::SystemRunner;
use crate::{cli, constants};

pub fn run(cli_args: cli::Cli) -> Result<(), OctError> {
    let new_root_location = install_location();

    match cli_args.commands {
        // Default is to validate
        None | Some(cli::Commands::Validate) => validate::run(&cli_args.manifest).map(|_| ()),

        Some(cli::Commands::Apply) if cli_args.dry_run => {
            let plan = apply::plan(&cli_args.manifest, &new_root_location)?;
            println!("{}", plan.to_json_string());

            Ok(())
        }

        Some(cli::Commands::Apply) => {
            warn_non_root();

            let report = apply::run(&SystemRunner, &cli_args.manifest, &new_root_location)?;
            println!("{}", report.to_json_string());

            Ok(())
        }

        Some(cli::Commands::Chroot { cmd }) => {
            warn_non_root();

            let command = cmd.join(" ");
            if cli_args.dry_run {
                let cmd = archchroot::cmd_arch_chroot(&new_root_location, &command);
                println!("{cmd}");

                return Ok(());
            }

            let report = chroot::run(&SystemRunner, &new_root_location, &command)?;
            println!("{}", report.to_json_string());

            Ok(())
        }
    }
}

pub(super) fn read_manifest(manifest_file: &str) -> Result<Manifest, OctError> {
    let manifest_yaml = std::fs::read_to_string(manifest_file)
        .map_err(|err| OctError::FileError(err, manifest_file.to_string()))?;

    Manifest::from_yaml(&manifest_yaml)
}

fn install_location() -> String {
    env::var(constants::ENV_OCTOBER_LOC).unwrap_or(defaults::INSTALL_LOCATION.to_string())
}

fn warn_non_root() {
    if !Uid::effective().is_root() {
        println!("{}", "WARN: running as non-root user".yellow())
    }
}
