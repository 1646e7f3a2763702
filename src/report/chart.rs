//! Bar chart rendering.
//!
//! The report only supplies (label, value) series; turning them into
//! chart markup is the job of a [`ChartRenderer`]. The default renderer
//! emits Plotly figures that load the library from a CDN.

use anyhow::{Context, Result};
use serde_json::json;

/// A single bar chart: one bar per label.
#[derive(Debug, Clone)]
pub struct BarSeries {
    /// Chart title.
    pub title: String,
    /// Label axis title.
    pub x_title: String,
    /// Value axis title.
    pub y_title: String,
    /// Bar color (any CSS color).
    pub color: String,
    /// Category labels, in display order.
    pub labels: Vec<String>,
    /// One value per label.
    pub values: Vec<f64>,
}

/// Produces embeddable chart markup.
pub trait ChartRenderer {
    /// Markup for the document `<head>` (script includes).
    fn head_markup(&self) -> String;

    /// Markup for one bar chart, placed in an element with the given id.
    fn render_bar(&self, element_id: &str, series: &BarSeries) -> Result<String>;
}

/// Renders charts with Plotly.js.
#[derive(Debug, Clone)]
pub struct PlotlyRenderer {
    cdn_url: String,
}

impl PlotlyRenderer {
    /// Create a renderer that loads Plotly from `cdn_url`.
    pub fn new(cdn_url: impl Into<String>) -> Self {
        Self {
            cdn_url: cdn_url.into(),
        }
    }
}

impl ChartRenderer for PlotlyRenderer {
    fn head_markup(&self) -> String {
        format!(
            "<script src=\"{}\"></script>",
            super::html_escape(&self.cdn_url)
        )
    }

    fn render_bar(&self, element_id: &str, series: &BarSeries) -> Result<String> {
        if series.labels.len() != series.values.len() {
            anyhow::bail!(
                "Chart '{}' has {} labels but {} values",
                series.title,
                series.labels.len(),
                series.values.len()
            );
        }

        let data = json!([{
            "type": "bar",
            "x": series.labels,
            "y": series.values,
            "marker": { "color": series.color },
        }]);
        let layout = json!({
            "title": { "text": series.title },
            "xaxis": { "title": { "text": series.x_title } },
            "yaxis": { "title": { "text": series.y_title } },
        });

        let data = script_safe_json(&data)
            .with_context(|| format!("Failed to encode chart data for '{}'", series.title))?;
        let layout = script_safe_json(&layout)
            .with_context(|| format!("Failed to encode chart layout for '{}'", series.title))?;

        Ok(format!(
            "<div id=\"{id}\" class=\"plotly-graph-div\" style=\"height:100%; width:100%;\"></div>\n\
             <script type=\"text/javascript\">\n\
             Plotly.newPlot(\"{id}\", {data}, {layout}, {{\"responsive\": true}});\n\
             </script>",
            id = super::html_escape(element_id),
            data = data,
            layout = layout,
        ))
    }
}

/// Serialize JSON so it cannot terminate an enclosing `<script>` element.
fn script_safe_json(value: &serde_json::Value) -> Result<String> {
    let encoded = serde_json::to_string(value)?;
    Ok(encoded.replace("</", "<\\/"))
}
