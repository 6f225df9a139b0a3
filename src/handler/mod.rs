//! Request handler module
//!
//! Routes requests to the three endpoints: the documentation redirect,
//! the status report and the regex test report.

pub mod report;
pub mod router;
pub mod status;

// Re-export main entry point
pub use router::handle_request;
