pub mod dereference;
pub mod openapi;

pub use openapi::{DocumentSource, load_openapi, parse_openapi};
