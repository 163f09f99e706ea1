// SPDX-License-Identifier: (LGPL-2.1 OR BSD-2-Clause)
use clap::Parser;
mod outf;
extern crate flowplot;

use flowplot::dashboard::{PageView, View, EMPTY_MESSAGE};
use flowplot::{CancellationToken, Metric, Record};

#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
enum OutputFormat {
    Columnar,
    Csv,
    Json,
}

#[derive(Debug, Parser)]
#[clap(
    version,
    long_about = r#"
Page through network-flow records.

Reads a CSV with a header row (a local path or an http(s) URL) containing
a Timestamp, a Label, and any of these metrics:
- Average Packet Size
- Total Length of Fwd Packets
- Subflow Fwd Bytes
- Packet Length Mean
- Avg Fwd Segment Size
- Fwd Packet Length Max
- Fwd Packet Length Mean
- Packet Length Variance
- Packet Length Std
- Max Packet Length

One page of records is printed in a columnar, CSV, or JSON format.

The same records may be plotted using `fp-plot`:
```sh
fp -i flows.csv --page 2
fp-plot -i flows.csv -o /tmp/flows
```
"#
)]
struct Cli {
    /// Path or http(s) URL of the csv input (with a header)
    #[arg(long, short, default_value = flowplot::DEFAULT_SOURCE)]
    input: String,
    /// Page to show, clamped to the available pages
    #[arg(long, short, default_value = "1")]
    page: usize,
    /// Records per page
    #[arg(long, short = 'n', default_value = "20")]
    page_size: usize,
    /// Metric column to show, may be repeated (default: all)
    #[arg(long = "metric", short = 'm')]
    metrics: Vec<Metric>,
    /// Some output styles are better for humans (columnar), others for machines
    #[arg(long, short = 'f', default_value = "columnar")]
    output_format: OutputFormat,
    /// Write records to this file, if present, or to standard output if not given
    #[arg(long, short = 'o')]
    output_file: Option<std::path::PathBuf>,
    /// Fail the load on a timestamp that doesn't parse, rather than keeping it as invalid
    #[arg(long)]
    strict_timestamps: bool,
    /// Field delimiter of the input
    #[arg(long, short, default_value = ",")]
    delimiter: char,
    /// Omit the header as the first line of output
    ///
    /// Has no effect when the output format ('-f, --output-format') is json.
    #[arg(long, verbatim_doc_comment)]
    no_header: bool,
    /// Read commands from standard input to move between pages
    ///
    /// - n, next      next page
    /// - p, previous  previous page
    /// - <number>     go to page
    /// - q, quit      exit
    #[arg(long, verbatim_doc_comment)]
    interactive: bool,
    /// Show record, page, and label counts instead of records
    #[arg(long, conflicts_with = "interactive")]
    summary: bool,
}

impl Cli {
    fn cfg(&self) -> Result<flowplot::Cfg, flowplot::Error> {
        let delimiter = u8::try_from(self.delimiter)
            .map_err(|_| flowplot::Error::Misconfig("delimiter must be a single byte"))?;
        let cfg = flowplot::Cfg {
            page_size: self.page_size,
            timestamp_mode: if self.strict_timestamps {
                flowplot::TimestampMode::Strict
            } else {
                flowplot::TimestampMode::Lenient
            },
            delimiter,
            ..flowplot::Cfg::default()
        };
        cfg.validate()?;
        Ok(cfg)
    }

    fn metrics(&self) -> Vec<Metric> {
        if self.metrics.is_empty() {
            Metric::ALL.to_vec()
        } else {
            self.metrics.clone()
        }
    }
}

fn csv_line<'a>(fields: impl IntoIterator<Item = &'a str>) -> String {
    let mut w = csv::WriterBuilder::new().from_writer(Vec::new());
    if let Err(e) = w.write_record(fields) {
        log::error!("{e}");
    }
    let line = w.into_inner().unwrap_or_default();
    String::from_utf8_lossy(&line).trim_end().to_string()
}

fn show_header(format: OutputFormat, metrics: &[Metric]) {
    use OutputFormat::*;
    match format {
        Columnar => {
            let mut line = format!("{:<20} {:<16}", "time", "label");
            for m in metrics {
                line.push_str(&format!(" {:>12.12}", m.name()));
            }
            outf::outfprintln!("{line}")
        }
        Csv => {
            let names = ["time", "label"]
                .into_iter()
                .chain(metrics.iter().map(|m| m.name()));
            outf::outfprintln!("{}", csv_line(names))
        }
        Json => (),
    }
}

fn show_record(format: OutputFormat, metrics: &[Metric], record: &Record) {
    use OutputFormat::*;
    let t = record.time.to_string();
    let l = record.label.as_deref().unwrap_or("");
    let values: Vec<String> = metrics
        .iter()
        .map(|m| record.metric(*m).map(|c| c.to_string()).unwrap_or_default())
        .collect();
    match format {
        Columnar => {
            let mut line = format!("{t:<20} {l:<16}");
            for v in &values {
                line.push_str(&format!(" {v:>12}"));
            }
            outf::outfprintln!("{line}")
        }
        Csv => {
            let fields = [t.as_str(), l]
                .into_iter()
                .chain(values.iter().map(String::as_str));
            outf::outfprintln!("{}", csv_line(fields))
        }
        Json => outf::outfprintln!("{}", flowplot::record::to_json(record, metrics)),
    }
}

fn show_page(opts: &Cli, view: &View) {
    match view {
        View::Loading => (),
        View::Empty => outf::outfprintln!("{EMPTY_MESSAGE}"),
        View::Page(PageView { slice, .. }) => {
            let metrics = opts.metrics();
            if !opts.no_header {
                show_header(opts.output_format, &metrics);
            }
            for record in slice.iter() {
                show_record(opts.output_format, &metrics, record);
            }
        }
    }
    outf::flush();
}

fn show_summary(view: &View) {
    match view {
        View::Loading => (),
        View::Empty => outf::outfprintln!("{EMPTY_MESSAGE}"),
        View::Page(v) => {
            let invalid = v.records.iter().filter(|r| !r.time.is_valid()).count();
            outf::outfprintln!("records        {}", v.records.len());
            outf::outfprintln!("pages          {}", v.total_pages);
            outf::outfprintln!("invalid times  {invalid}");
            for (label, n) in flowplot::chart::label_counts(v.records) {
                outf::outfprintln!("label          {label:<24} {n}");
            }
        }
    }
    outf::flush();
}

fn show_prompt(view: &View) {
    if let View::Page(v) = view {
        let prev = if v.previous_disabled { "-" } else { "p" };
        let next = if v.next_disabled { "-" } else { "n" };
        eprint!("[page {}/{}] {prev} {next} <page> q: ", v.page, v.total_pages);
    } else {
        eprint!("[no pages] q: ");
    }
}

async fn interact(
    opts: &Cli,
    dashboard: &mut flowplot::Dashboard,
    cancel: &CancellationToken,
) -> Result<(), Box<dyn std::error::Error>> {
    use tokio::io::AsyncBufReadExt;
    let mut lines = tokio::io::BufReader::new(tokio::io::stdin()).lines();
    loop {
        show_prompt(&dashboard.view());
        let line = tokio::select! {
            biased;
            _ = cancel.cancelled() => return Ok(()),
            l = lines.next_line() => l?,
        };
        let Some(line) = line else {
            return Ok(());
        };
        match line.trim() {
            "q" | "quit" => return Ok(()),
            "n" | "next" => {
                dashboard.next_page();
            }
            "p" | "prev" | "previous" => {
                dashboard.previous_page();
            }
            "" => continue,
            other => match other.parse::<usize>() {
                Ok(page) => {
                    dashboard.go_to_page(page);
                }
                Err(_) => {
                    eprintln!("Unknown command: {other}");
                    continue;
                }
            },
        }
        show_page(opts, &dashboard.view());
    }
}

async fn fp(opts: Cli, cancel: CancellationToken) -> Result<(), Box<dyn std::error::Error>> {
    let source: flowplot::Source = opts.input.parse()?;
    let mut dashboard = flowplot::Dashboard::new(opts.cfg()?);
    dashboard.load(&source, &cancel).await;
    if cancel.is_cancelled() {
        return Ok(());
    }
    dashboard.go_to_page(opts.page);
    if opts.summary {
        show_summary(&dashboard.view());
        return Ok(());
    }
    show_page(&opts, &dashboard.view());
    if opts.interactive {
        interact(&opts, &mut dashboard, &cancel).await?;
    }
    Ok(())
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();
    let opts = Cli::parse();
    outf::init(&opts.output_file)?;
    let cancel = CancellationToken::new();
    let on_ctrl_c = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            on_ctrl_c.cancel();
        }
    });
    let r = fp(opts, cancel).await;
    outf::flush();
    r
}
