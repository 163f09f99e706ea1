use clap::Parser;
use flowplot::dashboard::{page_file_name, View};
use flowplot::{CancellationToken, Metric};

#[derive(Debug, Parser)]
#[clap(version)]
struct Cli {
    /// Path or http(s) URL of the csv input (with a header) for plotting
    #[arg(short, long, default_value = flowplot::DEFAULT_SOURCE)]
    input: String,
    /// Directory for the (html) pages of the plot
    #[arg(short, long, default_value = "fp-plot")]
    output_dir: std::path::PathBuf,
    /// Records per page of the time series charts
    #[arg(short = 'n', long, default_value = "20")]
    page_size: usize,
    /// Write only this page, rather than every page
    #[arg(short, long)]
    page: Option<usize>,
    /// Metric averaged per label in the bar chart
    #[arg(long, default_value = "average-packet-size")]
    bar_metric: Metric,
    /// Fail on a timestamp that doesn't parse, rather than plotting a gap
    #[arg(long)]
    strict_timestamps: bool,
    /// Field delimiter of the input
    #[arg(short, long, default_value = ",")]
    delimiter: char,
}

fn cfg_from_cli(opts: &Cli) -> Result<flowplot::Cfg, flowplot::Error> {
    let cfg = flowplot::Cfg {
        page_size: opts.page_size,
        timestamp_mode: if opts.strict_timestamps {
            flowplot::TimestampMode::Strict
        } else {
            flowplot::TimestampMode::Lenient
        },
        delimiter: u8::try_from(opts.delimiter)
            .map_err(|_| flowplot::Error::Misconfig("delimiter must be a single byte"))?,
        bar_metric: opts.bar_metric,
    };
    cfg.validate()?;
    Ok(cfg)
}

fn write_page(
    dashboard: &flowplot::Dashboard,
    dir: &std::path::Path,
    name: &str,
) -> Result<(), Box<dyn std::error::Error>> {
    let path = dir.join(name);
    std::fs::write(&path, dashboard.render_html())?;
    log::info!("Wrote {}", path.display());
    Ok(())
}

fn plot_pages(
    dashboard: &mut flowplot::Dashboard,
    opts: &Cli,
) -> Result<(), Box<dyn std::error::Error>> {
    std::fs::create_dir_all(&opts.output_dir)?;
    let total = match dashboard.view() {
        View::Page(v) => v.total_pages,
        View::Loading | View::Empty => 1,
    };
    let pages = match opts.page {
        Some(page) => {
            let page = dashboard.go_to_page(page);
            page..=page
        }
        None => 1..=total,
    };
    for page in pages {
        dashboard.go_to_page(page);
        write_page(dashboard, &opts.output_dir, &page_file_name(page))?;
        if page == 1 {
            write_page(dashboard, &opts.output_dir, "index.html")?;
        }
    }
    Ok(())
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();
    let opts = Cli::parse();
    let source: flowplot::Source = opts.input.parse()?;
    let mut dashboard = flowplot::Dashboard::new(cfg_from_cli(&opts)?);
    let cancel = CancellationToken::new();
    let on_ctrl_c = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            on_ctrl_c.cancel();
        }
    });
    dashboard.load(&source, &cancel).await;
    if cancel.is_cancelled() {
        return Ok(());
    }
    plot_pages(&mut dashboard, &opts)
}
