use anyhow::anyhow;
use axum::{routing::get, Router};
use metrics::{describe_counter, describe_gauge};
use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};
use once_cell::sync::OnceCell;

pub struct Metrics {
    pub handle: PrometheusHandle,
}

impl Metrics {
    /// Install the Prometheus recorder (once per process) and describe pipeline series.
    pub fn init() -> anyhow::Result<Self> {
        let handle = PrometheusBuilder::new()
            .install_recorder()
            .map_err(|e| anyhow!("prometheus: install recorder: {e}"))?;
        ensure_described();
        Ok(Self { handle })
    }

    /// Returns a router exposing `/metrics` with the Prometheus exposition format.
    pub fn router(&self) -> Router {
        let handle = self.handle.clone();
        Router::new().route(
            "/metrics",
            get(move || {
                let h = handle.clone();
                async move { h.render() }
            }),
        )
    }
}

/// One-time metrics registration (so series show up on /metrics).
pub fn ensure_described() {
    static ONCE: OnceCell<()> = OnceCell::new();
    ONCE.get_or_init(|| {
        describe_counter!("pipeline_rows_total", "Raw rows received, by batch.");
        describe_counter!(
            "pipeline_rows_dropped_total",
            "Rows dropped because both key fields were absent, by batch."
        );
        describe_counter!("pipeline_stage_total", "Classified prospects, by stage.");
        describe_counter!(
            "pipeline_structural_errors_total",
            "Batches rejected for a missing required column."
        );
        describe_gauge!("pipeline_last_run_ts", "Unix ts of the last completed report.");
    });
}
