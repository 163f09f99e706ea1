//! The dashboard's state: load status, the loaded records, and the pager.
use crate::cfg::Cfg;
use crate::chart::{AggregateChart, BarChart, Chart, MetricChart, PieChart};
use crate::error::Error;
use crate::loader::Source;
use crate::pager::Pager;
use crate::record::{Metric, Record};
use tokio_util::sync::CancellationToken;

pub const TITLE: &str = "Network Traffic Visualization";
pub const LOADING_MESSAGE: &str = "Loading data...";
pub const EMPTY_MESSAGE: &str = "No data available";
const PLOTLY_JS: &str = "https://cdn.plot.ly/plotly-2.27.0.min.js";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadStatus {
    Loading,
    Loaded,
    Failed,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PageView<'a> {
    pub page: usize,
    pub total_pages: usize,
    pub previous_disabled: bool,
    pub next_disabled: bool,
    /// For the detail charts.
    pub slice: &'a [Record],
    /// For the summary charts.
    pub records: &'a [Record],
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum View<'a> {
    Loading,
    Empty,
    Page(PageView<'a>),
}

pub fn page_file_name(page: usize) -> String {
    format!("page-{page}.html")
}

#[derive(Debug, Clone)]
pub struct Dashboard {
    cfg: Cfg,
    status: LoadStatus,
    records: Vec<Record>,
    pager: Pager,
}

impl Dashboard {
    pub fn new(cfg: Cfg) -> Self {
        Self {
            cfg,
            status: LoadStatus::Loading,
            records: Vec::new(),
            pager: Pager::new(cfg.page_size),
        }
    }

    pub fn status(&self) -> LoadStatus {
        self.status
    }

    pub fn records(&self) -> &[Record] {
        &self.records
    }

    pub fn pager(&self) -> &Pager {
        &self.pager
    }

    /// Load and project `source`. Failures are logged and leave the dashboard
    /// empty. Nothing is committed once `cancel` has fired.
    pub async fn load(&mut self, source: &Source, cancel: &CancellationToken) -> LoadStatus {
        let r = self.fetch_records(source, cancel).await;
        if cancel.is_cancelled() {
            log::debug!("Load of {source} cancelled, state left as is");
            return self.status;
        }
        match r {
            Ok(records) => {
                log::info!("Loaded {} records from {source}", records.len());
                self.records = records;
                self.status = LoadStatus::Loaded;
            }
            Err(e) => {
                log::error!("Error fetching the CSV file: {e}");
                self.records.clear();
                self.status = LoadStatus::Failed;
            }
        }
        self.pager = Pager::new(self.cfg.page_size);
        self.status
    }

    async fn fetch_records(
        &self,
        source: &Source,
        cancel: &CancellationToken,
    ) -> Result<Vec<Record>, Error> {
        self.cfg.validate()?;
        let rows = crate::loader::load(source, self.cfg.delimiter, cancel).await?;
        crate::record::project(&rows, self.cfg.timestamp_mode)
    }

    pub fn next_page(&mut self) -> usize {
        self.pager.next(self.records.len())
    }

    pub fn previous_page(&mut self) -> usize {
        self.pager.previous()
    }

    pub fn go_to_page(&mut self, page: usize) -> usize {
        self.pager.go_to(page, self.records.len())
    }

    pub fn view(&self) -> View<'_> {
        if self.status == LoadStatus::Loading {
            return View::Loading;
        }
        if self.records.is_empty() {
            return View::Empty;
        }
        let len = self.records.len();
        View::Page(PageView {
            page: self.pager.current_page(),
            total_pages: self.pager.total_pages(len),
            previous_disabled: self.pager.previous_disabled(),
            next_disabled: self.pager.next_disabled(len),
            slice: self.pager.slice(&self.records),
            records: &self.records,
        })
    }

    /// A standalone HTML document for the current view.
    pub fn render_html(&self) -> String {
        let body = match self.view() {
            View::Loading => format!("<p>{LOADING_MESSAGE}</p>"),
            View::Empty => format!("<p>{EMPTY_MESSAGE}</p>"),
            View::Page(v) => self.render_page(&v),
        };
        format!(
            r#"<!DOCTYPE html>
<html>
<head>
<meta charset="utf-8">
<title>{TITLE}</title>
<script src="{PLOTLY_JS}"></script>
</head>
<body>
<div class="App">
<h1>{TITLE}</h1>
{body}
</div>
</body>
</html>
"#
        )
    }

    fn render_page(&self, v: &PageView) -> String {
        fn nav(text: &str, page: usize, disabled: bool) -> String {
            if disabled {
                format!(r#"<button disabled>{text}</button>"#)
            } else {
                format!(r#"<a href="{}"><button>{text}</button></a>"#, page_file_name(page))
            }
        }
        let mut html = String::new();
        html.push_str(r#"<div class="chart-container">"#);
        html.push_str(r#"<div class="pagination">"#);
        html.push_str(&nav("Previous", v.page.saturating_sub(1), v.previous_disabled));
        html.push_str(&format!(" <span>Page {} of {}</span> ", v.page, v.total_pages));
        html.push_str(&nav("Next", v.page + 1, v.next_disabled));
        html.push_str("</div>\n");
        html.push_str(&AggregateChart.render(v.slice).to_inline_html(Some("aggregate")));
        for (i, m) in Metric::ALL.into_iter().enumerate() {
            let id = format!("metric-{i}");
            html.push_str(r#"<div class="chart-item">"#);
            html.push_str(&MetricChart(m).render(v.slice).to_inline_html(Some(id.as_str())));
            html.push_str("</div>\n");
        }
        html.push_str("<h1>Other charts: </h1>\n");
        html.push_str(r#"<div class="chart-container">"#);
        html.push_str(&PieChart.render(v.records).to_inline_html(Some("pie")));
        html.push_str(r#"<div class="chart-item">"#);
        let bar = BarChart {
            metric: self.cfg.bar_metric,
        };
        html.push_str(&bar.render(v.records).to_inline_html(Some("bar")));
        html.push_str("</div></div></div>\n");
        html
    }
}
