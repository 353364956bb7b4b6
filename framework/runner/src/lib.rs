mod catalog;
mod cli;
mod definition;
mod init;
mod progress;
mod run;
mod sampler;
mod transport;
mod types;

pub mod prelude {
    pub use crate::catalog::{load_catalog, parse_catalog};
    pub use crate::cli::{GraderCli, ReporterOpt};
    pub use crate::definition::{BenchmarkDefinition, BenchmarkDefinitionBuilder};
    pub use crate::init::init;
    pub use crate::progress::AttemptProgress;
    pub use crate::run::{run, run_with};
    pub use crate::sampler::{Sampler, TimingPolicy};
    pub use crate::transport::{
        HttpTransport, Transport, TransportError, TransportResponse,
        DEFAULT_PROCESS_TIME_HEADER,
    };
    pub use crate::types::GraderResult;

    pub use latency_grader_core::prelude::*;
    pub use latency_grader_instruments::{ReportCollector, ReportConfig, Reporter, RunHeader};
}
