mod cfg;
mod error;

pub mod cell;
pub mod chart;
pub mod dashboard;
pub mod loader;
pub mod pager;
pub mod record;
pub mod time;

pub use cfg::{Cfg, TimestampMode, DEFAULT_PAGE_SIZE, DEFAULT_SOURCE};
pub use error::Error;

pub use cell::Cell;
pub use dashboard::{Dashboard, LoadStatus, View};
pub use loader::Source;
pub use record::{Metric, Record};
pub use tokio_util::sync::CancellationToken;
