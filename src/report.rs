//! Progress report rendering.
//!
//! Read-only view of the OKR document: goals and metrics in stored
//! order, one line per metric. A percentage is shown only when the
//! target is numeric and positive; text or zero targets print the raw
//! values with no percentage token.

use crate::models::{Metric, MetricValue, OkrDocument};

/// Render the complete progress report.
pub fn render_report(doc: &OkrDocument, year: i32) -> String {
    let mut output = String::new();

    output.push_str(&format!(
        "\n=== {} OKR Progress (Updated: {}) ===\n\n",
        year, doc.last_update
    ));

    for goal in doc.goals.values() {
        output.push_str(&format!("[{}]\n", goal.title));
        for (key, metric) in &goal.metrics {
            output.push_str(&format!("  {}: {}\n", key, format_metric(metric)));
        }
        output.push('\n');
    }

    output
}

/// Format one metric line: `current / target`, with a percentage when
/// both are numeric and the target is positive.
fn format_metric(metric: &Metric) -> String {
    let current = metric
        .current
        .as_ref()
        .map(format_value)
        .unwrap_or_else(|| "-".to_string());
    let target = format_value(&metric.target);

    let numeric_pair = metric
        .current
        .as_ref()
        .and_then(MetricValue::as_number)
        .zip(metric.target.as_number());

    match numeric_pair {
        Some((c, t)) if t > 0 => {
            let percent = c as f64 / t as f64 * 100.0;
            format!("{} / {} ({:.1}%)", current, target, percent)
        }
        _ => format!("{} / {}", current, target),
    }
}

fn format_value(value: &MetricValue) -> String {
    match value {
        MetricValue::Number(n) => group_thousands(*n),
        MetricValue::Text(s) => s.clone(),
    }
}

/// Insert thousands separators: 42000 -> "42,000".
fn group_thousands(n: i64) -> String {
    let digits = n.unsigned_abs().to_string();
    let mut grouped = String::new();
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(c);
    }
    if n < 0 {
        format!("-{}", grouped)
    } else {
        grouped
    }
}
