//! HTML report formatter.

use crate::analyzer::types::{AnalysisResult, MetricDefinition, ResourceWithMetrics};

const STYLE: &str = "body{font-family:-apple-system,Segoe UI,Helvetica,Arial,sans-serif;margin:2rem;color:#1f2933}\
table{border-collapse:collapse;margin:0.5rem 0 1.5rem;width:100%}\
th,td{border:1px solid #d9e2ec;padding:0.35rem 0.6rem;text-align:left;vertical-align:top}\
th{background:#f0f4f8}\
.high{color:#b42318;font-weight:600}.medium{color:#b54708}.low{color:#475467}\
.errors li{color:#b42318}";

/// Escape text for use in HTML element content and attribute values.
pub fn escape(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

/// Format an analysis result as a standalone HTML document.
pub fn format(result: &AnalysisResult) -> String {
    let mut output = String::new();
    let path = result.metadata.template_path.display().to_string();

    output.push_str("<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n<meta charset=\"utf-8\">\n");
    output.push_str(&format!(
        "<title>CloudWatch metrics for {}</title>\n<style>{}</style>\n</head>\n<body>\n",
        escape(&path),
        STYLE
    ));
    output.push_str(&format!("<h1>CloudWatch metrics for {}</h1>\n", escape(&path)));

    push_metadata(&mut output, result);

    for resource in &result.resources {
        push_resource(&mut output, resource);
    }

    if !result.unsupported_resources.is_empty() {
        output.push_str("<h2>Unsupported resources</h2>\n<ul>\n");
        for id in &result.unsupported_resources {
            output.push_str(&format!("<li>{}</li>\n", escape(id)));
        }
        output.push_str("</ul>\n");
    }

    if let Some(errors) = result.errors.as_ref().filter(|e| !e.is_empty()) {
        output.push_str("<h2>Errors</h2>\n<ul class=\"errors\">\n");
        for error in errors {
            output.push_str(&format!(
                "<li><strong>{}</strong> ({}): {}</li>\n",
                escape(&error.resource_id),
                escape(&error.resource_type),
                escape(&error.message)
            ));
        }
        output.push_str("</ul>\n");
    }

    output.push_str("</body>\n</html>\n");
    output
}

fn push_metadata(output: &mut String, result: &AnalysisResult) {
    let meta = &result.metadata;
    let rows = [
        ("Generated at", meta.generated_at.clone()),
        ("Version", meta.version.clone()),
        ("Total resources", meta.total_resources.to_string()),
        ("Supported resources", meta.supported_resources.to_string()),
        ("Metrics", result.metric_count().to_string()),
        ("Processing time", format!("{} ms", meta.processing_time_ms)),
        ("Peak memory", format!("{:.1} MB", meta.memory_peak_mb)),
    ];

    output.push_str("<h2>Summary</h2>\n<table class=\"summary\">\n");
    for (label, value) in rows {
        output.push_str(&format!(
            "<tr><th>{}</th><td>{}</td></tr>\n",
            label,
            escape(&value)
        ));
    }
    output.push_str("</table>\n");
}

fn push_resource(output: &mut String, resource: &ResourceWithMetrics) {
    output.push_str(&format!(
        "<h2>{} <small>{}</small></h2>\n",
        escape(&resource.logical_id),
        escape(&resource.resource_type)
    ));

    if resource.metrics.is_empty() {
        output.push_str("<p>No metrics recommended.</p>\n");
        return;
    }

    output.push_str(
        "<table>\n<tr><th>Metric</th><th>Namespace</th><th>Statistic</th><th>Unit</th>\
<th>Warning</th><th>Critical</th><th>Period (s)</th><th>Category</th><th>Importance</th>\
<th>Dimensions</th><th>Description</th></tr>\n",
    );
    for metric in &resource.metrics {
        push_metric_row(output, metric);
    }
    output.push_str("</table>\n");
}

fn push_metric_row(output: &mut String, metric: &MetricDefinition) {
    let dimensions = metric
        .dimensions
        .iter()
        .map(|d| format!("{}={}", d.name, d.value))
        .collect::<Vec<_>>()
        .join(", ");

    output.push_str(&format!(
        "<tr><td>{}</td><td>{}</td><td>{}</td><td>{}</td><td>{}</td><td>{}</td><td>{}</td>\
<td>{}</td><td class=\"{}\">{}</td><td>{}</td><td>{}</td></tr>\n",
        escape(&metric.name),
        escape(&metric.namespace),
        escape(&metric.statistic),
        escape(&metric.unit),
        metric.recommended_threshold.warning,
        metric.recommended_threshold.critical,
        metric.evaluation_period,
        metric.category,
        metric.importance.as_str().to_lowercase(),
        metric.importance,
        escape(&dimensions),
        escape(&metric.description),
    ));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analyzer::types::{AnalysisMetadata, Dimension, Importance, MetricCategory, Threshold};
    use serde_json::Map;
    use std::path::PathBuf;

    fn result() -> AnalysisResult {
        AnalysisResult {
            metadata: AnalysisMetadata {
                version: "0.4.0".to_string(),
                generated_at: "now".to_string(),
                template_path: PathBuf::from("<stack>.yaml"),
                total_resources: 2,
                supported_resources: 1,
                processing_time_ms: 4,
                parse_time_ms: 1,
                extract_time_ms: 0,
                generate_time_ms: 3,
                memory_peak_mb: 12.5,
            },
            resources: vec![ResourceWithMetrics {
                logical_id: "Queue".to_string(),
                resource_type: "AWS::SQS::Queue".to_string(),
                resource_properties: Map::new(),
                metrics: vec![MetricDefinition {
                    name: "ApproximateAgeOfOldestMessage".to_string(),
                    namespace: "AWS/SQS".to_string(),
                    unit: "Seconds".to_string(),
                    description: "Age & <latency>".to_string(),
                    statistic: "Maximum".to_string(),
                    recommended_threshold: Threshold {
                        warning: 300.0,
                        critical: 900.0,
                    },
                    evaluation_period: 300,
                    category: MetricCategory::Latency,
                    importance: Importance::High,
                    dimensions: vec![Dimension::new("QueueName", "Queue")],
                }],
            }],
            unsupported_resources: vec!["Bucket".to_string()],
            errors: None,
            performance_metrics: None,
        }
    }

    #[test]
    fn test_escape() {
        assert_eq!(escape("<a href=\"x\">&'"), "&lt;a href=&quot;x&quot;&gt;&amp;&#39;");
    }

    #[test]
    fn test_report_sections() {
        let html = format(&result());
        assert!(html.starts_with("<!DOCTYPE html>"));
        assert!(html.contains("&lt;stack&gt;.yaml"));
        assert!(html.contains("ApproximateAgeOfOldestMessage"));
        assert!(html.contains("Age &amp; &lt;latency&gt;"));
        assert!(html.contains("QueueName=Queue"));
        assert!(html.contains("<li>Bucket</li>"));
        assert!(!html.contains("<h2>Errors</h2>"));
        assert!(!html.contains("<stack>"));
    }
}
