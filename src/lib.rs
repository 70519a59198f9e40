pub mod config;
pub mod db;
pub mod downloader;
pub mod error;
pub mod harvest;
pub mod model;
pub mod progress;
pub mod search;
pub mod session;
pub mod store;
pub mod utils;

pub use config::AppConfig;
pub use error::Error;
pub use harvest::{BatchSummary, Harvester};
pub use model::{DownloadResult, ImageDescriptor, StoredImage};
pub use progress::{BarReporter, ProgressReporter, SilentReporter};
pub use search::SearchClient;
pub use session::{RoundOutcome, Session};
pub use store::ImageStore;
