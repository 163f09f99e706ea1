pub const DEFAULT_PAGE_SIZE: usize = 20;
pub const DEFAULT_SOURCE: &str = "test_data_w_timeframe.csv";

/// What to do with a `Timestamp` cell that doesn't parse.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum TimestampMode {
    /// Keep the record, with an invalid time.
    #[default]
    Lenient,
    /// Fail the whole load.
    Strict,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Cfg {
    pub page_size: usize,
    pub timestamp_mode: TimestampMode,
    pub delimiter: u8,
    /// Metric averaged per label by the bar chart.
    pub bar_metric: crate::record::Metric,
}

impl Default for Cfg {
    fn default() -> Self {
        Self {
            page_size: DEFAULT_PAGE_SIZE,
            timestamp_mode: TimestampMode::Lenient,
            delimiter: b',',
            bar_metric: crate::record::Metric::AveragePacketSize,
        }
    }
}

impl Cfg {
    pub fn validate(&self) -> Result<(), crate::error::Error> {
        use crate::error::Error::Misconfig;
        if self.page_size == 0 {
            return Err(Misconfig("page size must be greater than zero"));
        }
        if matches!(self.delimiter, b'"' | b'\n' | b'\r') {
            return Err(Misconfig("delimiter cannot be a quote or a line break"));
        }
        Ok(())
    }
}
