//! Projection of parsed rows into flow records.
use crate::cell::Cell;
use crate::cfg::TimestampMode;
use crate::error::Error;
use crate::loader::Row;
use crate::time::{parse_time, Time};

pub const TIMESTAMP_COLUMN: &str = "Timestamp";
pub const LABEL_COLUMN: &str = "Label";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "clap", derive(clap::ValueEnum))]
pub enum Metric {
    AveragePacketSize,
    TotalLengthOfFwdPackets,
    SubflowFwdBytes,
    PacketLengthMean,
    AvgFwdSegmentSize,
    FwdPacketLengthMax,
    FwdPacketLengthMean,
    PacketLengthVariance,
    PacketLengthStd,
    MaxPacketLength,
}

impl Metric {
    pub const ALL: [Metric; 10] = [
        Metric::AveragePacketSize,
        Metric::TotalLengthOfFwdPackets,
        Metric::SubflowFwdBytes,
        Metric::PacketLengthMean,
        Metric::AvgFwdSegmentSize,
        Metric::FwdPacketLengthMax,
        Metric::FwdPacketLengthMean,
        Metric::PacketLengthVariance,
        Metric::PacketLengthStd,
        Metric::MaxPacketLength,
    ];

    /// The exact CSV column name.
    pub const fn name(self) -> &'static str {
        use Metric::*;
        match self {
            AveragePacketSize => "Average Packet Size",
            TotalLengthOfFwdPackets => "Total Length of Fwd Packets",
            SubflowFwdBytes => "Subflow Fwd Bytes",
            PacketLengthMean => "Packet Length Mean",
            AvgFwdSegmentSize => "Avg Fwd Segment Size",
            FwdPacketLengthMax => "Fwd Packet Length Max",
            FwdPacketLengthMean => "Fwd Packet Length Mean",
            PacketLengthVariance => "Packet Length Variance",
            PacketLengthStd => "Packet Length Std",
            MaxPacketLength => "Max Packet Length",
        }
    }

    const fn index(self) -> usize {
        self as usize
    }
}

impl std::fmt::Display for Metric {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// One network-flow observation.
#[derive(Debug, Clone, PartialEq)]
pub struct Record {
    pub time: Time,
    metrics: [Option<Cell>; 10],
    pub label: Option<String>,
}

impl Record {
    /// The cell as it was loaded; `None` if the column was absent.
    pub fn metric(&self, m: Metric) -> Option<&Cell> {
        self.metrics[m.index()].as_ref()
    }

    /// The plottable value, if the cell is numeric.
    pub fn metric_value(&self, m: Metric) -> Option<f64> {
        self.metric(m).and_then(Cell::as_f64)
    }
}

impl serde::Serialize for Record {
    fn serialize<S: serde::Serializer>(&self, s: S) -> Result<S::Ok, S::Error> {
        use serde::ser::SerializeMap;
        let mut map = s.serialize_map(Some(Metric::ALL.len() + 2))?;
        map.serialize_entry("time", &self.time)?;
        for m in Metric::ALL {
            if let Some(cell) = self.metric(m) {
                map.serialize_entry(m.name(), cell)?;
            }
        }
        if let Some(label) = &self.label {
            map.serialize_entry("label", label)?;
        }
        map.end()
    }
}

/// The record as a json object, with only `metrics` among its metric fields.
pub fn to_json(record: &Record, metrics: &[Metric]) -> serde_json::Value {
    let mut value = serde_json::to_value(record).unwrap_or_default();
    if let serde_json::Value::Object(obj) = &mut value {
        for m in Metric::ALL {
            if !metrics.contains(&m) {
                obj.remove(m.name());
            }
        }
    }
    value
}

fn label_of(row: &Row) -> Option<String> {
    match row.get(LABEL_COLUMN)? {
        Cell::Null => None,
        Cell::Text(s) => Some(s.clone()),
        other => Some(other.to_string()),
    }
}

pub fn project_row(row: &Row) -> Record {
    Record {
        time: parse_time(row.get(TIMESTAMP_COLUMN)),
        metrics: Metric::ALL.map(|m| row.get(m.name()).cloned()),
        label: label_of(row),
    }
}

/// One record per row, in row order.
pub fn project(rows: &[Row], mode: TimestampMode) -> Result<Vec<Record>, Error> {
    let mut invalid = 0;
    let mut records = Vec::with_capacity(rows.len());
    for (i, row) in rows.iter().enumerate() {
        let record = project_row(row);
        if !record.time.is_valid() {
            if mode == TimestampMode::Strict {
                return Err(Error::Timestamp {
                    row: i + 1,
                    value: row
                        .get(TIMESTAMP_COLUMN)
                        .map(Cell::to_string)
                        .unwrap_or_default(),
                });
            }
            invalid += 1;
        }
        records.push(record);
    }
    if invalid > 0 {
        log::warn!("{invalid} of {} records have an invalid timestamp", records.len());
    }
    Ok(records)
}
