#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Error {
    Fetch(String),
    Decode(String),
    Parse(String),
    Timestamp { row: usize, value: String },
    Cancelled,
    Misconfig(&'static str),
}

impl std::error::Error for Error {}

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        use Error::*;
        match self {
            Fetch(m) => write!(f, "Fetch: {m}"),
            Decode(m) => write!(f, "Decode: {m}"),
            Parse(m) => write!(f, "Parse: {m}"),
            Timestamp { row, value } => write!(f, "Timestamp: row {row}: {value:?}"),
            Cancelled => write!(f, "Cancelled"),
            Misconfig(m) => write!(f, "Misconfig: {m}"),
        }
    }
}

impl From<csv::Error> for Error {
    fn from(e: csv::Error) -> Self {
        match e.position() {
            Some(pos) => Error::Parse(format!("line {}: {e}", pos.line())),
            None => Error::Parse(e.to_string()),
        }
    }
}

impl From<reqwest::Error> for Error {
    fn from(e: reqwest::Error) -> Self {
        Error::Fetch(e.to_string())
    }
}
