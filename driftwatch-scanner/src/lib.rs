pub mod actuator;
pub mod backend;
pub mod error;
pub mod frontend;
pub mod result;
pub mod source;

pub use actuator::fetch_actuator_mappings;
pub use backend::BackendScanner;
pub use error::ScanError;
pub use frontend::{FrontendScan, FrontendScanner};
pub use result::Hit;
