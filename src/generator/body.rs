//! Request body selection
//!
//! Exactly one declared media type becomes the step's payload. A JSON or XML
//! body matching the target content type is preferred over anything seen
//! before it; every other representation only fills an empty slot.

use super::values::ValueResolver;
use crate::config::GenerateOptions;
use crate::error::Result;
use crate::models::openapi::{MediaType, media_type_essence};
use crate::models::{Operation, RequestPayload, Variant};
use serde_json::Value;

/// The chosen body and the headers that go with it
#[derive(Debug, Clone, PartialEq)]
pub struct ComposedBody {
    pub payload: RequestPayload,
    pub content_type: String,
    /// Whether an `Accept` header should mirror the content type
    pub negotiated: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum BodyKind {
    Json,
    Xml,
    Form,
    Multipart,
    Text,
    File,
}

impl BodyKind {
    fn classify(media_type: &str) -> Self {
        match media_type_essence(media_type).as_str() {
            "application/json" => BodyKind::Json,
            "application/xml" => BodyKind::Xml,
            "application/x-www-form-urlencoded" => BodyKind::Form,
            "multipart/form-data" => BodyKind::Multipart,
            "text/plain" => BodyKind::Text,
            _ => BodyKind::File,
        }
    }

    fn payload(self, value: Value) -> RequestPayload {
        match self {
            BodyKind::Json => RequestPayload::Json(value),
            BodyKind::Xml => RequestPayload::Xml(value),
            BodyKind::Form => RequestPayload::Form(value),
            BodyKind::Multipart => RequestPayload::Multipart(value),
            BodyKind::Text => RequestPayload::Raw(value),
            BodyKind::File => RequestPayload::File(value),
        }
    }
}

/// Compose the request body for `operation`, if one should be sent
pub fn compose(
    operation: &Operation,
    resolver: &mut ValueResolver<'_>,
    options: &GenerateOptions,
) -> Result<Option<ComposedBody>> {
    if !options.generator.request_body {
        return Ok(None);
    }
    let Some(request_body) = &operation.request_body else {
        return Ok(None);
    };
    if !options.generator.optional_params && !request_body.required {
        return Ok(None);
    }

    let target = media_type_essence(&options.content_type);
    let mut chosen: Option<ComposedBody> = None;

    for (media_type, media) in &request_body.content {
        let kind = BodyKind::classify(media_type);

        match kind {
            BodyKind::Json | BodyKind::Xml => {
                let matches_target = media_type_essence(media_type) == target;
                let already_negotiated = chosen.as_ref().is_some_and(|c| c.negotiated);
                if matches_target && !already_negotiated {
                    chosen = Some(select(kind, media_type, media, resolver, true)?);
                }
            }
            _ => {
                if chosen.is_none() {
                    chosen = Some(select(kind, media_type, media, resolver, false)?);
                }
            }
        }
    }

    Ok(chosen)
}

fn select(
    kind: BodyKind,
    media_type: &str,
    media: &MediaType,
    resolver: &mut ValueResolver<'_>,
    negotiated: bool,
) -> Result<ComposedBody> {
    let value = resolver.resolve(Variant::from(media))?;
    Ok(ComposedBody {
        payload: kind.payload(value),
        content_type: media_type.to_string(),
        negotiated,
    })
}
