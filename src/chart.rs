//! Chart adapters. Each one shapes records for plotly and hands them over.
//!
//! The detail charts (`MetricChart`, `AggregateChart`) are given the current
//! page. The summary charts (`PieChart`, `BarChart`) are given every record.
use crate::record::{Metric, Record};

pub const NO_LABEL: &str = "(none)";

pub trait Chart {
    fn title(&self) -> String;
    fn render(&self, records: &[Record]) -> plotly::Plot;
}

/// X (time) and Y (metric) columns. Gaps are `None` and reach plotly as `null`.
pub fn series(records: &[Record], metric: Metric) -> (Vec<Option<String>>, Vec<Option<f64>>) {
    records
        .iter()
        .map(|r| {
            let x = r.time.datetime().map(|_| r.time.to_string());
            (x, r.metric_value(metric))
        })
        .unzip()
}

/// Records per label, in order of first appearance.
pub fn label_counts(records: &[Record]) -> Vec<(String, usize)> {
    let mut counts: Vec<(String, usize)> = Vec::new();
    for r in records {
        let label = r.label.as_deref().unwrap_or(NO_LABEL);
        match counts.iter_mut().find(|(l, _)| l == label) {
            Some((_, n)) => *n += 1,
            None => counts.push((label.to_string(), 1)),
        }
    }
    counts
}

/// Mean of the numeric values of `metric` per label, in order of first appearance.
pub fn label_means(records: &[Record], metric: Metric) -> Vec<(String, Option<f64>)> {
    let mut sums: Vec<(String, f64, usize)> = Vec::new();
    for r in records {
        let label = r.label.as_deref().unwrap_or(NO_LABEL);
        let i = match sums.iter().position(|(l, _, _)| l == label) {
            Some(i) => i,
            None => {
                sums.push((label.to_string(), 0.0, 0));
                sums.len() - 1
            }
        };
        if let Some(v) = r.metric_value(metric) {
            sums[i].1 += v;
            sums[i].2 += 1;
        }
    }
    sums.into_iter()
        .map(|(l, sum, n)| (l, (n > 0).then(|| sum / n as f64)))
        .collect()
}

fn plot_with_title(title: &str) -> plotly::Plot {
    let mut p = plotly::Plot::new();
    p.set_layout(plotly::layout::Layout::new().title(title));
    p
}

fn scatter(records: &[Record], metric: Metric) -> Box<plotly::Scatter<Option<String>, Option<f64>>> {
    let (x, y) = series(records, metric);
    plotly::Scatter::new(x, y)
        .mode(plotly::common::Mode::LinesMarkers)
        .name(metric.name())
}

/// One metric over time.
#[derive(Debug, Clone, Copy)]
pub struct MetricChart(pub Metric);

impl Chart for MetricChart {
    fn title(&self) -> String {
        self.0.name().to_string()
    }

    fn render(&self, records: &[Record]) -> plotly::Plot {
        let mut p = plot_with_title(&self.title());
        p.add_trace(scatter(records, self.0));
        p
    }
}

/// Every metric over time, overlaid.
#[derive(Debug, Clone, Copy, Default)]
pub struct AggregateChart;

impl Chart for AggregateChart {
    fn title(&self) -> String {
        "All metrics".to_string()
    }

    fn render(&self, records: &[Record]) -> plotly::Plot {
        let mut p = plot_with_title(&self.title());
        for m in Metric::ALL {
            p.add_trace(scatter(records, m));
        }
        p
    }
}

/// Share of records per label.
#[derive(Debug, Clone, Copy, Default)]
pub struct PieChart;

impl Chart for PieChart {
    fn title(&self) -> String {
        "Records by label".to_string()
    }

    fn render(&self, records: &[Record]) -> plotly::Plot {
        let mut p = plot_with_title(&self.title());
        let (labels, values): (Vec<String>, Vec<usize>) = label_counts(records).into_iter().unzip();
        if !values.is_empty() {
            p.add_trace(plotly::Pie::new(values).labels(labels));
        }
        p
    }
}

/// Mean of one metric per label.
#[derive(Debug, Clone, Copy)]
pub struct BarChart {
    pub metric: Metric,
}

impl Default for BarChart {
    fn default() -> Self {
        Self {
            metric: Metric::AveragePacketSize,
        }
    }
}

impl Chart for BarChart {
    fn title(&self) -> String {
        format!("Mean {} by label", self.metric)
    }

    fn render(&self, records: &[Record]) -> plotly::Plot {
        let mut p = plot_with_title(&self.title());
        let (labels, means): (Vec<String>, Vec<Option<f64>>) =
            label_means(records, self.metric).into_iter().unzip();
        if !labels.is_empty() {
            p.add_trace(plotly::Bar::new(labels, means).name(self.metric.name()));
        }
        p
    }
}
