//! JSON report rendering for interoperability with other tools

use crate::types::{BatchResult, MetricMap, MetricRecord, ModelInfo};
use serde::Serialize;

/// Top-level JSON report structure
#[derive(Debug, Serialize)]
struct ReportJson<'a> {
    /// One entry per discovered file, in input order
    results: Vec<ResultJson<'a>>,
    /// Metric key -> mean over successful entries
    summary: MetricMap,
}

/// JSON representation of a single record
#[derive(Debug, Serialize)]
struct ResultJson<'a> {
    file: &'a str,
    path: String,
    model: &'static str,
    success: bool,
    processing_secs: f64,
    #[serde(skip_serializing_if = "MetricMap::is_empty")]
    metrics: MetricMap,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<&'a str>,
}

/// Render the full report as pretty-printed JSON
pub fn render(batch: &BatchResult, model: &ModelInfo) -> serde_json::Result<String> {
    let mut summary = MetricMap::new();
    for (def, mean) in batch.metric_means(model.metrics) {
        summary.insert(def.key, mean);
    }

    let report = ReportJson {
        results: batch.records.iter().map(record_to_json).collect(),
        summary,
    };

    serde_json::to_string_pretty(&report)
}

fn record_to_json(record: &MetricRecord) -> ResultJson<'_> {
    ResultJson {
        file: &record.file,
        path: record.path.to_string_lossy().into_owned(),
        model: record.model,
        success: record.succeeded(),
        processing_secs: record.elapsed.as_secs_f64(),
        metrics: record.metrics.clone(),
        error: record.error.as_deref(),
    }
}
