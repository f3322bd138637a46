//! Human-readable text report rendering

use crate::types::{BatchResult, MetricDef, MetricRecord, ModelInfo};
use std::fmt::Write;

const TITLE_RULE_LEN: usize = 50;
const RECORD_RULE_LEN: usize = 30;

/// Render the full report as plain text
pub fn render(batch: &BatchResult, model: &ModelInfo) -> String {
    let mut out = String::new();

    let _ = writeln!(out, "{}", model.title);
    let _ = writeln!(out, "{}", "=".repeat(TITLE_RULE_LEN));
    out.push('\n');

    for record in &batch.records {
        render_record(&mut out, record, model.metrics);
    }

    render_summary(&mut out, batch, model.metrics);
    out
}

fn render_record(out: &mut String, record: &MetricRecord, defs: &'static [MetricDef]) {
    let _ = writeln!(out, "File: {}", record.file);
    let _ = writeln!(out, "Path: {}", record.path.display());

    if let Some(error) = &record.error {
        let _ = writeln!(out, "Error: {}", first_line(error));
    } else {
        let _ = writeln!(out, "Metrics:");
        for def in defs {
            if let Some(value) = record.metrics.get(def.key) {
                let _ = writeln!(
                    out,
                    "  {} ({}): {:.3}{}",
                    def.label,
                    def.abbr,
                    value,
                    unit_suffix(def)
                );
            }
        }
    }

    let _ = writeln!(out, "{}", "-".repeat(RECORD_RULE_LEN));
    out.push('\n');
}

fn render_summary(out: &mut String, batch: &BatchResult, defs: &'static [MetricDef]) {
    let _ = writeln!(out, "Summary");
    let _ = writeln!(out, "{}", "-".repeat(RECORD_RULE_LEN));
    let _ = writeln!(out, "Total files processed: {}", batch.total());
    let _ = writeln!(out, "Succeeded: {}", batch.succeeded());
    let _ = writeln!(out, "Failed: {}", batch.failed());

    for (def, mean) in batch.metric_means(defs) {
        let _ = writeln!(out, "Average {}: {:.3}{}", def.abbr, mean, unit_suffix(def));
    }
}

fn unit_suffix(def: &MetricDef) -> String {
    match def.unit {
        Some(unit) => format!(" {unit}"),
        None => String::new(),
    }
}

/// Errors can carry multi-line tips; the report keeps only the headline.
fn first_line(message: &str) -> &str {
    message.lines().next().unwrap_or(message).trim_end()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{MetricMap, MetricRecord};
    use std::path::Path;
    use std::time::Duration;

    static DEFS: [MetricDef; 2] = [
        MetricDef { key: "stoi", label: "Speech Intelligibility", abbr: "STOI", unit: None },
        MetricDef { key: "si_sdr", label: "Signal Distortion", abbr: "SI-SDR", unit: Some("dB") },
    ];

    static INFO: ModelInfo = ModelInfo {
        name: "squim",
        title: "Speech Quality Assessment Results (SQUIM)",
        metrics: &DEFS,
    };

    fn success_record(path: &str, stoi: f64, si_sdr: f64) -> MetricRecord {
        let mut metrics = MetricMap::new();
        metrics.insert("stoi", stoi);
        metrics.insert("si_sdr", si_sdr);
        MetricRecord::success(Path::new(path), "squim", metrics, Duration::from_millis(50))
    }

    #[test]
    fn test_render_contains_title_and_records() {
        let mut batch = BatchResult::default();
        batch.push(success_record("/audio/a.wav", 0.95, 18.2));

        let text = render(&batch, &INFO);
        assert!(text.starts_with("Speech Quality Assessment Results (SQUIM)\n"));
        assert!(text.contains(&"=".repeat(50)));
        assert!(text.contains("File: a.wav"));
        assert!(text.contains("Path: /audio/a.wav"));
        assert!(text.contains("Speech Intelligibility (STOI): 0.950"));
        assert!(text.contains("Signal Distortion (SI-SDR): 18.200 dB"));
    }

    #[test]
    fn test_render_failure_shows_first_line_only() {
        let mut batch = BatchResult::default();
        batch.push(MetricRecord::failure(
            Path::new("/audio/bad.wav"),
            "squim",
            "Failed to decode /audio/bad.wav: corrupt header\n  Tip: re-encode the file".to_string(),
            Duration::from_millis(5),
        ));

        let text = render(&batch, &INFO);
        assert!(text.contains("Error: Failed to decode /audio/bad.wav: corrupt header"));
        assert!(!text.contains("Tip:"));
        assert!(!text.contains("Metrics:"));
    }

    #[test]
    fn test_summary_counts_and_means() {
        let mut batch = BatchResult::default();
        batch.push(success_record("/audio/a.wav", 0.9, 10.0));
        batch.push(success_record("/audio/b.wav", 0.7, 20.0));
        batch.push(MetricRecord::failure(
            Path::new("/audio/c.xyz"),
            "squim",
            "Unsupported format 'xyz'".to_string(),
            Duration::from_millis(1),
        ));

        let text = render(&batch, &INFO);
        assert!(text.contains("Total files processed: 3"));
        assert!(text.contains("Succeeded: 2"));
        assert!(text.contains("Failed: 1"));
        assert!(text.contains("Average STOI: 0.800"));
        assert!(text.contains("Average SI-SDR: 15.000 dB"));
    }

    #[test]
    fn test_empty_batch_still_renders_summary() {
        let batch = BatchResult::default();
        let text = render(&batch, &INFO);
        assert!(text.contains("Total files processed: 0"));
        assert!(!text.contains("Average"));
    }
}
