//! Prometheus text exposition (format 0.0.4).

use std::fmt::Write;

use crate::family::{MetricFamily, Value};

/// Content type served alongside [`encode_text`] output.
pub const TEXT_CONTENT_TYPE: &str = "text/plain; version=0.0.4; charset=utf-8";

/// Helper to escape label values.
fn escape_label(v: &str) -> String {
    v.replace('\\', "\\\\").replace('"', "\\\"").replace('\n', "\\n")
}

fn escape_help(v: &str) -> String {
    v.replace('\\', "\\\\").replace('\n', "\\n")
}

fn fmt_float(v: f64) -> String {
    if v.is_nan() {
        "NaN".into()
    } else if v == f64::INFINITY {
        "+Inf".into()
    } else if v == f64::NEG_INFINITY {
        "-Inf".into()
    } else {
        v.to_string()
    }
}

fn label_str(labels: &[(String, String)], extra: Option<(&str, &str)>) -> String {
    let mut parts: Vec<String> = labels
        .iter()
        .map(|(k, v)| format!("{}=\"{}\"", k, escape_label(v)))
        .collect();
    if let Some((k, v)) = extra {
        parts.push(format!("{}=\"{}\"", k, escape_label(v)));
    }
    if parts.is_empty() {
        String::new()
    } else {
        format!("{{{}}}", parts.join(","))
    }
}

/// Render families in order. Families without series are omitted.
pub fn encode_text(families: &[MetricFamily]) -> String {
    let mut out = String::new();
    for fam in families.iter().filter(|f| !f.series.is_empty()) {
        let name = &fam.name;
        let _ = writeln!(out, "# HELP {} {}", name, escape_help(&fam.help));
        let _ = writeln!(out, "# TYPE {} {}", name, fam.kind);

        for s in &fam.series {
            let labels = label_str(&s.labels, None);
            match &s.value {
                Value::Counter(v) => {
                    let _ = writeln!(out, "{name}{labels} {v}");
                }
                Value::Gauge(v) | Value::Untyped(v) => {
                    let _ = writeln!(out, "{name}{labels} {}", fmt_float(*v));
                }
                Value::Histogram {
                    buckets,
                    sum,
                    count,
                } => {
                    for (le, c) in buckets {
                        let le = fmt_float(*le);
                        let _ = writeln!(
                            out,
                            "{name}_bucket{} {c}",
                            label_str(&s.labels, Some(("le", le.as_str())))
                        );
                    }
                    let _ = writeln!(
                        out,
                        "{name}_bucket{} {count}",
                        label_str(&s.labels, Some(("le", "+Inf")))
                    );
                    let _ = writeln!(out, "{name}_sum{labels} {}", fmt_float(*sum));
                    let _ = writeln!(out, "{name}_count{labels} {count}");
                }
                Value::Summary { sum, count } => {
                    let _ = writeln!(out, "{name}_sum{labels} {}", fmt_float(*sum));
                    let _ = writeln!(out, "{name}_count{labels} {count}");
                }
            }
        }
    }
    out
}
