mod cli;
mod constants;
mod entity;
mod errors;
mod install;
mod linux;
mod logging;
mod run;
mod utils;

use clap::Parser;

fn main() -> Result<(), errors::OctError> {
    logging::init();

    let args = cli::Cli::parse();
    run::run(args).map_err(|err| {
        tracing::error!(cause = %err.root_cause(), "october failed");
        err
    })
}
