//! Building blocks for turning one OpenAPI operation into one workflow step
//!
//! - `values`: picks a concrete value for a parameter or body
//! - `params`: binds parameters onto the URL, query, headers and cookies
//! - `body`: selects the request body representation
//! - `checks`: derives the response assertions
//! - `faker`: synthesizes values from schemas when nothing is declared

pub mod body;
pub mod checks;
pub mod faker;
pub mod params;
pub mod values;

pub use body::{ComposedBody, compose};
pub use checks::compose_checks;
pub use faker::{FakerOptions, SchemaFaker};
pub use params::{BoundParameters, bind};
pub use values::{ValueResolver, literal_example};
