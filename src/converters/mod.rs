//! Converters for generating test documents from OpenAPI descriptions
//!
//! This module provides the conversion trait and the workflow converter
//! that turns every operation into a test step grouped into suites.

pub mod workflow;

pub use workflow::WorkflowConverter;

use crate::config::GenerateOptions;
use crate::error::Result;
use crate::models::ApiDocument;

/// Trait for converting an OpenAPI document into a test document
pub trait Converter {
    /// The output type of the conversion
    type Output;

    /// Convert an entire OpenAPI document
    fn convert(&self, document: &ApiDocument, options: &GenerateOptions) -> Result<Self::Output>;
}
