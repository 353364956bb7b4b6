use crate::cli::GraderCli;
use clap::Parser;

/// Initialise logging and parse the command line for a benchmark binary.
pub fn init() -> GraderCli {
    env_logger::init();

    GraderCli::parse()
}
