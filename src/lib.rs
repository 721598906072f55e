pub mod layout;
pub mod copy;
pub mod index;
pub mod exporter;
pub mod config;

pub use layout::{AssetRule, CopyJob, ReportKey, ReportLayout, ASSET_TABLE};
pub use copy::scoped_copy;
pub use index::{read_index, write_index, IndexRecord, INDEX_FILE_NAME};
pub use exporter::{export, list_subdirs, ExportSummary};
pub use config::{ConfigLoader, ExportConfig};
