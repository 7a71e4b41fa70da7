pub mod openapi;
pub mod workflow;

pub use openapi::{ApiDocument, Operation, Parameter, ParameterLocation, Variant};
pub use workflow::{Check, HttpStep, RequestPayload, Step, Suite, WorkflowDocument};
