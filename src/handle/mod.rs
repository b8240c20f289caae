//! Log handles and the file-system helpers they rely on.

pub mod fs;
pub mod log_handle;

pub use log_handle::LogHandle;
