//! HTML report generation.
//!
//! This module composes the static HTML report: the aggregate table
//! (slowest transactions first) followed by two bar charts. Chart markup
//! comes from a [`ChartRenderer`]; this module only builds the series and
//! the document shell around them.

use super::chart::{BarSeries, ChartRenderer};
use super::html_escape;
use crate::analysis::{sort_by_avg_desc, total_samples};
use crate::config::ReportConfig;
use crate::models::AggregateRow;
use anyhow::{Context, Result};
use chrono::{DateTime, Utc};

const STYLE: &str = r#"
        body { font-family: Arial, sans-serif; padding: 20px; }
        h2 { color: #333; }
        .meta { color: #666; font-size: 0.9em; margin-bottom: 1em; }
        table.report {
            border-collapse: collapse;
            width: 100%;
        }
        table.report th, table.report td {
            border: 1px solid #ddd;
            padding: 8px;
            text-align: center;
        }
        table.report th {
            background-color: #f2f2f2;
            color: #333;
        }
"#;

/// Generate a complete HTML report.
pub fn generate_html_report(
    rows: &[AggregateRow],
    config: &ReportConfig,
    renderer: &dyn ChartRenderer,
    generated_at: DateTime<Utc>,
) -> Result<String> {
    let mut output = String::new();

    output.push_str("<!DOCTYPE html>\n<html lang=\"en\">\n");
    output.push_str(&generate_head(&config.title, renderer));
    output.push_str("<body>\n");

    output.push_str(&format!("<h2>📊 {}</h2>\n", html_escape(&config.title)));
    output.push_str(&generate_meta_section(rows, generated_at));
    output.push_str(&generate_table(rows));

    output.push_str("<h2>🚀 Charts</h2>\n");
    output.push_str(&generate_charts_section(rows, config, renderer)?);

    output.push_str("</body>\n</html>\n");

    Ok(output)
}

/// Generate the document head.
fn generate_head(title: &str, renderer: &dyn ChartRenderer) -> String {
    let mut head = String::new();

    head.push_str("<head>\n");
    head.push_str("    <meta charset=\"UTF-8\">\n");
    head.push_str(&format!("    <title>{}</title>\n", html_escape(title)));
    head.push_str(&format!("    {}\n", renderer.head_markup()));
    head.push_str(&format!("    <style>{}    </style>\n", STYLE));
    head.push_str("</head>\n");

    head
}

/// Generate the run summary line.
fn generate_meta_section(rows: &[AggregateRow], generated_at: DateTime<Utc>) -> String {
    format!(
        "<p class=\"meta\">Generated {} | Transactions: {} | Samples: {}</p>\n",
        generated_at.format("%Y-%m-%d %H:%M:%S UTC"),
        rows.len(),
        total_samples(rows)
    )
}

/// Generate the aggregate table, slowest transactions first.
fn generate_table(rows: &[AggregateRow]) -> String {
    let mut table = String::new();

    table.push_str("<table class=\"report\">\n  <thead>\n    <tr>");
    for column in super::AGGREGATE_COLUMNS {
        table.push_str(&format!("<th>{}</th>", column));
    }
    table.push_str("</tr>\n  </thead>\n  <tbody>\n");

    for row in sort_by_avg_desc(rows) {
        table.push_str(&format!(
            "    <tr><td>{}</td><td>{}</td><td>{:.2}</td><td>{:.2}</td>\
             <td>{:.2}</td><td>{:.2}</td><td>{:.2}</td></tr>\n",
            html_escape(&row.label),
            row.samples,
            row.avg_resp_time,
            row.min_resp_time,
            row.max_resp_time,
            row.error_pct,
            row.throughput,
        ));
    }

    table.push_str("  </tbody>\n</table>\n");

    table
}

/// Generate both bar charts.
fn generate_charts_section(
    rows: &[AggregateRow],
    config: &ReportConfig,
    renderer: &dyn ChartRenderer,
) -> Result<String> {
    let labels: Vec<String> = rows.iter().map(|r| r.label.clone()).collect();

    let avg_series = BarSeries {
        title: "Average Response Time by Transaction".to_string(),
        x_title: "Transaction Label".to_string(),
        y_title: "Avg Response Time (ms)".to_string(),
        color: config.avg_color.clone(),
        labels: labels.clone(),
        values: rows.iter().map(|r| r.avg_resp_time).collect(),
    };

    let error_series = BarSeries {
        title: "Error Percentage by Transaction".to_string(),
        x_title: "Transaction Label".to_string(),
        y_title: "Error %".to_string(),
        color: config.error_color.clone(),
        labels,
        values: rows.iter().map(|r| r.error_pct).collect(),
    };

    let avg_chart = renderer
        .render_bar("chart-avg-resp-time", &avg_series)
        .context("Failed to render response time chart")?;
    let error_chart = renderer
        .render_bar("chart-error-pct", &error_series)
        .context("Failed to render error percentage chart")?;

    Ok(format!("{}\n<br><br>\n{}\n", avg_chart, error_chart))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::report::chart::PlotlyRenderer;
    use chrono::TimeZone;

    fn rows() -> Vec<AggregateRow> {
        vec![
            AggregateRow {
                label: "Checkout".to_string(),
                samples: 1,
                avg_resp_time: 200.0,
                min_resp_time: 200.0,
                max_resp_time: 200.0,
                error_pct: 0.0,
                throughput: 1.0,
            },
            AggregateRow {
                label: "Login".to_string(),
                samples: 2,
                avg_resp_time: 350.5,
                min_resp_time: 100.0,
                max_resp_time: 601.0,
                error_pct: 50.0,
                throughput: 2.0,
            },
        ]
    }

    fn generated_at() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 5, 1, 12, 30, 0).unwrap()
    }

    struct FailingRenderer;

    impl ChartRenderer for FailingRenderer {
        fn head_markup(&self) -> String {
            String::new()
        }

        fn render_bar(&self, _element_id: &str, _series: &BarSeries) -> Result<String> {
            anyhow::bail!("renderer offline")
        }
    }

    #[test]
    fn test_generate_html_report() {
        let config = ReportConfig::default();
        let renderer = PlotlyRenderer::new(config.plotly_cdn_url.clone());
        let html = generate_html_report(&rows(), &config, &renderer, generated_at()).unwrap();

        assert!(html.starts_with("<!DOCTYPE html>"));
        assert!(html.contains("<title>JMeter Aggregate Report</title>"));
        assert!(html.contains("<script src=\"https://cdn.plot.ly/plotly-latest.min.js\"></script>"));
        assert!(html.contains("<table class=\"report\">"));
        assert!(html.contains("chart-avg-resp-time"));
        assert!(html.contains("chart-error-pct"));
        assert!(html.contains("Generated 2024-05-01 12:30:00 UTC"));
        assert!(html.contains("Transactions: 2 | Samples: 3"));
        assert!(html.trim_end().ends_with("</html>"));
    }

    #[test]
    fn test_table_sorted_by_avg_desc() {
        let table = generate_table(&rows());
        let login = table.find("<td>Login</td>").unwrap();
        let checkout = table.find("<td>Checkout</td>").unwrap();
        assert!(login < checkout);
        assert!(table.contains("<td>350.50</td>"));
        assert!(table.contains("<th>throughput</th>"));
    }

    #[test]
    fn test_labels_are_escaped() {
        let mut rows = rows();
        rows[0].label = "<b>Cart & Pay</b>".to_string();
        let table = generate_table(&rows);
        assert!(table.contains("&lt;b&gt;Cart &amp; Pay&lt;/b&gt;"));
        assert!(!table.contains("<b>"));
    }

    #[test]
    fn test_charts_use_configured_colors() {
        let mut config = ReportConfig::default();
        config.avg_color = "#123456".to_string();
        config.error_color = "#abcdef".to_string();
        let renderer = PlotlyRenderer::new(config.plotly_cdn_url.clone());

        let charts = generate_charts_section(&rows(), &config, &renderer).unwrap();
        assert!(charts.contains("#123456"));
        assert!(charts.contains("#abcdef"));
        assert!(charts.contains("Error Percentage by Transaction"));
    }

    #[test]
    fn test_empty_rows() {
        let config = ReportConfig::default();
        let renderer = PlotlyRenderer::new(config.plotly_cdn_url.clone());
        let html = generate_html_report(&[], &config, &renderer, generated_at()).unwrap();
        assert!(html.contains("<tbody>\n  </tbody>"));
        assert!(html.contains("Transactions: 0 | Samples: 0"));
    }

    #[test]
    fn test_renderer_failure_propagates() {
        let config = ReportConfig::default();
        let err = generate_html_report(&rows(), &config, &FailingRenderer, generated_at())
            .unwrap_err();
        let msg = format!("{:#}", err);
        assert!(msg.contains("Failed to render response time chart"));
        assert!(msg.contains("renderer offline"));
    }
}
