//! HTTP protocol layer module
//!
//! Parameter decoding, the JSON/JSONP writer and the fixed responses,
//! kept apart from the regex-testing logic.

pub mod form;
pub mod jsonp;
pub mod response;

// Re-export commonly used items
pub use form::{read_params, FormError, FormParams};
pub use jsonp::build_jsonp_response;
pub use response::{
    build_400_response, build_413_response, build_options_response, build_redirect_response,
};
