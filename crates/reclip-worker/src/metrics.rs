//! Prometheus recorder for CLI runs.
//!
//! The recorder is installed once per process; after a run the rendered
//! text exposition can be written to a file.

use metrics::counter;
use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};

use crate::error::{WorkerError, WorkerResult};

pub mod names {
    /// Artifact files written, by kind.
    pub const ARTIFACTS_WRITTEN_TOTAL: &str = "reclip_artifacts_written_total";

    /// Completed CLI runs, by command.
    pub const RUNS_TOTAL: &str = "reclip_runs_total";
}

/// Install the global Prometheus recorder.
pub fn init_metrics() -> WorkerResult<PrometheusHandle> {
    PrometheusBuilder::new()
        .install_recorder()
        .map_err(|e| WorkerError::Metrics(e.to_string()))
}

pub fn record_artifact_written(kind: &'static str) {
    counter!(names::ARTIFACTS_WRITTEN_TOTAL, "kind" => kind).increment(1);
}

pub fn record_run(command: &str) {
    counter!(names::RUNS_TOTAL, "command" => command.to_string()).increment(1);
}
