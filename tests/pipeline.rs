use flowplot::chart::{AggregateChart, BarChart, Chart, MetricChart, PieChart};
use flowplot::dashboard::{PageView, EMPTY_MESSAGE};
use flowplot::{CancellationToken, Cfg, Dashboard, LoadStatus, Metric, Source, View};
use tokio::io::{AsyncReadExt, AsyncWriteExt};

const HEADER: &str = "Timestamp,Average Packet Size,Total Length of Fwd Packets,Subflow Fwd Bytes,\
Packet Length Mean,Avg Fwd Segment Size,Fwd Packet Length Max,Fwd Packet Length Mean,\
Packet Length Variance,Packet Length Std,Max Packet Length,Label";

fn flows_csv(rows: usize) -> String {
    let mut csv = format!("{HEADER}\n");
    for i in 0..rows {
        let label = if i % 3 == 0 { "DDoS" } else { "BENIGN" };
        csv.push_str(&format!(
            "2017-07-07 03:{:02}:{:02},{i},{i},{i},{i},{i},{i},{i},{i},{i},{i},{label}\n",
            i / 60,
            i % 60
        ));
    }
    csv
}

fn write_csv(contents: &str) -> tempfile::NamedTempFile {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    std::io::Write::write_all(&mut file, contents.as_bytes()).unwrap();
    file
}

async fn load(contents: &str) -> Dashboard {
    let file = write_csv(contents);
    let mut d = Dashboard::new(Cfg::default());
    d.load(&Source::Path(file.path().into()), &CancellationToken::new())
        .await;
    d
}

fn page(view: View) -> PageView {
    match view {
        View::Page(v) => v,
        other => panic!("expected a page, got {other:?}"),
    }
}

/// Serve a single canned HTTP response on localhost.
async fn serve_once(response: String) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        let (mut sock, _) = listener.accept().await.unwrap();
        let mut req = Vec::new();
        let mut buf = [0u8; 1024];
        while !req.windows(4).any(|w| w == b"\r\n\r\n") {
            let n = sock.read(&mut buf).await.unwrap();
            if n == 0 {
                break;
            }
            req.extend_from_slice(&buf[..n]);
        }
        sock.write_all(response.as_bytes()).await.unwrap();
        sock.shutdown().await.ok();
    });
    format!("http://{addr}/test_data_w_timeframe.csv")
}

/// Send headers promising more body than is sent, then hold the connection open.
async fn serve_partial(body: String) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        let (mut sock, _) = listener.accept().await.unwrap();
        let mut buf = [0u8; 1024];
        let _ = sock.read(&mut buf).await.unwrap();
        let head = "HTTP/1.1 200 OK\r\nContent-Type: text/csv\r\nContent-Length: 100000\r\n\r\n";
        sock.write_all(head.as_bytes()).await.unwrap();
        sock.write_all(body.as_bytes()).await.unwrap();
        sock.flush().await.unwrap();
        tokio::time::sleep(std::time::Duration::from_secs(30)).await;
        drop(sock);
    });
    format!("http://{addr}/test_data_w_timeframe.csv")
}

#[tokio::test]
async fn forty_five_rows_make_three_pages() {
    let mut d = load(&flows_csv(45)).await;
    assert_eq!(d.status(), LoadStatus::Loaded);
    assert_eq!(d.records().len(), 45);

    let v = page(d.view());
    assert_eq!((v.page, v.total_pages), (1, 3));
    assert!(v.previous_disabled);
    assert!(!v.next_disabled);
    assert_eq!(v.slice.len(), 20);
    assert_eq!(v.records.len(), 45);

    d.next_page();
    d.next_page();
    let v = page(d.view());
    assert_eq!(v.page, 3);
    assert_eq!(v.slice.len(), 5);
    assert!(v.next_disabled);
    assert!(!v.previous_disabled);
    assert_eq!(v.slice[0].metric_value(Metric::MaxPacketLength), Some(40.0));

    assert_eq!(d.next_page(), 3);
    let html = d.render_html();
    assert!(html.contains(r#"<button disabled>Next</button>"#));
    assert!(html.contains(r#"href="page-2.html""#));
}

#[tokio::test]
async fn header_only_shows_no_data() {
    let mut d = load(&format!("{HEADER}\n")).await;
    assert_eq!(d.status(), LoadStatus::Loaded);
    assert_eq!(d.view(), View::Empty);
    assert!(d.pager().previous_disabled());
    assert!(d.pager().next_disabled(d.records().len()));
    assert_eq!(d.next_page(), 1);
    assert!(d.render_html().contains(EMPTY_MESSAGE));
}

#[tokio::test]
async fn http_404_leaves_the_dashboard_empty() {
    let url = serve_once(
        "HTTP/1.1 404 Not Found\r\nContent-Length: 0\r\nConnection: close\r\n\r\n".to_string(),
    )
    .await;
    let mut d = Dashboard::new(Cfg::default());
    let status = d.load(&url.parse().unwrap(), &CancellationToken::new()).await;
    assert_eq!(status, LoadStatus::Failed);
    assert!(d.records().is_empty());
    assert_eq!(d.view(), View::Empty);
    assert!(d.render_html().contains(EMPTY_MESSAGE));
}

#[tokio::test]
async fn http_200_loads_records() {
    let body = flows_csv(3);
    let url = serve_once(format!(
        "HTTP/1.1 200 OK\r\nContent-Type: text/csv\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
        body.len()
    ))
    .await;
    let mut d = Dashboard::new(Cfg::default());
    let source: Source = url.parse().unwrap();
    assert_eq!(d.load(&source, &CancellationToken::new()).await, LoadStatus::Loaded);
    let labels: Vec<_> = d.records().iter().map(|r| r.label.as_deref()).collect();
    assert_eq!(labels, [Some("DDoS"), Some("BENIGN"), Some("BENIGN")]);
}

#[tokio::test]
async fn missing_label_passes_through_to_charts() {
    let csv = format!("{HEADER}\n2017-07-07 03:30:00,1,2,3,4,5,6,7,8,9,10\n");
    let d = load(&csv).await;
    let v = page(d.view());
    assert_eq!(v.records[0].label, None);
    for chart in [
        Box::new(AggregateChart) as Box<dyn Chart>,
        Box::new(MetricChart(Metric::SubflowFwdBytes)),
        Box::new(PieChart),
        Box::new(BarChart::default()),
    ] {
        chart.render(v.records);
    }
    assert!(d.render_html().contains("Other charts"));
}

#[tokio::test]
async fn strict_timestamps_fail_the_whole_load() {
    let csv = format!("{}not a date,1,2,3,4,5,6,7,8,9,10,DDoS\n", flows_csv(2));
    let file = write_csv(&csv);
    let source = Source::Path(file.path().into());

    let mut lenient = Dashboard::new(Cfg::default());
    lenient.load(&source, &CancellationToken::new()).await;
    assert_eq!(lenient.records().len(), 3);
    assert!(!lenient.records()[2].time.is_valid());

    let mut strict = Dashboard::new(Cfg {
        timestamp_mode: flowplot::TimestampMode::Strict,
        ..Cfg::default()
    });
    assert_eq!(
        strict.load(&source, &CancellationToken::new()).await,
        LoadStatus::Failed
    );
    assert!(strict.records().is_empty());
}

#[tokio::test]
async fn cancel_while_body_arrives_commits_nothing() {
    let url = serve_partial(flows_csv(5)).await;
    let source: Source = url.parse().unwrap();

    let mut fresh = Dashboard::new(Cfg::default());
    let cancel = CancellationToken::new();
    let later = cancel.clone();
    tokio::spawn(async move {
        tokio::time::sleep(std::time::Duration::from_millis(200)).await;
        later.cancel();
    });
    let started = std::time::Instant::now();
    assert_eq!(fresh.load(&source, &cancel).await, LoadStatus::Loading);
    assert!(started.elapsed() < std::time::Duration::from_secs(10));
    assert!(fresh.records().is_empty());
    assert_eq!(fresh.view(), View::Loading);
}

#[tokio::test]
async fn cancelled_reload_keeps_previous_records() {
    let file = write_csv(&flows_csv(45));
    let mut d = Dashboard::new(Cfg::default());
    d.load(&Source::Path(file.path().into()), &CancellationToken::new())
        .await;
    d.go_to_page(2);

    let url = serve_partial(flows_csv(5)).await;
    let cancel = CancellationToken::new();
    let later = cancel.clone();
    tokio::spawn(async move {
        tokio::time::sleep(std::time::Duration::from_millis(200)).await;
        later.cancel();
    });
    assert_eq!(d.load(&url.parse().unwrap(), &cancel).await, LoadStatus::Loaded);
    assert_eq!(d.records().len(), 45);
    assert_eq!(d.pager().current_page(), 2);
}

#[tokio::test]
async fn reload_resets_to_the_first_page() {
    let file = write_csv(&flows_csv(45));
    let source = Source::Path(file.path().into());
    let mut d = Dashboard::new(Cfg::default());
    d.load(&source, &CancellationToken::new()).await;
    d.go_to_page(3);
    d.load(&source, &CancellationToken::new()).await;
    assert_eq!(d.pager().current_page(), 1);
}
