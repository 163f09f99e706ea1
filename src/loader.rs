//! Fetch a CSV resource, decode it, and parse it into rows of typed cells.
use crate::cell::Cell;
use crate::error::Error;
use tokio_util::sync::CancellationToken;

/// Where the CSV lives.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Source {
    Path(std::path::PathBuf),
    Url(reqwest::Url),
}

impl std::str::FromStr for Source {
    type Err = Error;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.starts_with("http://") || s.starts_with("https://") {
            reqwest::Url::parse(s)
                .map(Source::Url)
                .map_err(|e| Error::Fetch(format!("{s}: {e}")))
        } else {
            Ok(Source::Path(s.into()))
        }
    }
}

impl std::fmt::Display for Source {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            Source::Path(p) => write!(f, "{}", p.display()),
            Source::Url(u) => write!(f, "{u}"),
        }
    }
}

/// One data row. Cells are looked up by exact header name.
#[derive(Debug, Clone)]
pub struct Row {
    header: std::sync::Arc<[String]>,
    cells: Vec<Cell>,
}

impl Row {
    pub fn new(header: std::sync::Arc<[String]>, cells: Vec<Cell>) -> Self {
        Self { header, cells }
    }

    /// `None` when the column isn't in the header, or this row is too short to have it.
    pub fn get(&self, name: &str) -> Option<&Cell> {
        let i = self.header.iter().position(|h| h == name)?;
        self.cells.get(i)
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }
}

pub async fn fetch(source: &Source, cancel: &CancellationToken) -> Result<Vec<u8>, Error> {
    log::debug!("Fetching {source}");
    match source {
        Source::Path(path) => tokio::select! {
            biased;
            _ = cancel.cancelled() => Err(Error::Cancelled),
            r = tokio::fs::read(path) => {
                r.map_err(|e| Error::Fetch(format!("{}: {e}", path.display())))
            }
        },
        Source::Url(url) => {
            use futures::StreamExt;
            let resp = tokio::select! {
                biased;
                _ = cancel.cancelled() => return Err(Error::Cancelled),
                r = reqwest::get(url.clone()) => r?,
            };
            let status = resp.status();
            if !status.is_success() {
                return Err(Error::Fetch(format!("HTTP error! status: {}", status.as_u16())));
            }
            let mut body = Vec::new();
            let mut chunks = resp.bytes_stream();
            loop {
                let chunk = tokio::select! {
                    biased;
                    _ = cancel.cancelled() => return Err(Error::Cancelled),
                    c = chunks.next() => c,
                };
                match chunk {
                    Some(c) => body.extend_from_slice(&c?),
                    None => break,
                }
            }
            Ok(body)
        }
    }
}

pub fn decode(bytes: &[u8]) -> Result<String, Error> {
    let bytes = bytes.strip_prefix(b"\xEF\xBB\xBF").unwrap_or(bytes);
    std::str::from_utf8(bytes)
        .map(str::to_string)
        .map_err(|e| Error::Decode(e.to_string()))
}

/// Malformed quoting is tolerated the way browser CSV parsers tolerate it: a
/// stray quote inside a field is kept, and an unclosed quote runs to the end
/// of input. `Error::Parse` is left for reader failures.
pub fn parse(text: &str, delimiter: u8) -> Result<Vec<Row>, Error> {
    let mut rdr = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .trim(csv::Trim::None)
        .delimiter(delimiter)
        .from_reader(text.as_bytes());
    let header: std::sync::Arc<[String]> = rdr.headers()?.iter().map(str::to_string).collect();
    let mut rows = Vec::new();
    for r in rdr.records() {
        let record = r?;
        let cells = record
            .iter()
            .take(header.len())
            .map(Cell::from_field)
            .collect();
        rows.push(Row::new(header.clone(), cells));
    }
    log::debug!("Parsed {} rows with {} columns", rows.len(), header.len());
    Ok(rows)
}

/// Fetch, decode and parse. All or nothing.
pub async fn load(
    source: &Source,
    delimiter: u8,
    cancel: &CancellationToken,
) -> Result<Vec<Row>, Error> {
    let bytes = fetch(source, cancel).await?;
    let text = decode(&bytes)?;
    parse(&text, delimiter)
}
