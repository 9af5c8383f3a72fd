use serde_json::Value;

use crate::error::{AppError, DecodeError, Result};
use crate::models::{FeedItem, ModelType};

const TYPE_FIELD: &str = "type";

/// Decode one generic record into the variant named by its `type` field.
///
/// The discriminator is stripped before the body is matched against the
/// variant schema, so it never shows up in a product's extra fields.
pub fn decode_item(record: &Value) -> std::result::Result<FeedItem, DecodeError> {
    let fields = record
        .as_object()
        .ok_or(DecodeError::MissingDiscriminator)?;

    let name = fields
        .get(TYPE_FIELD)
        .and_then(Value::as_str)
        .ok_or(DecodeError::MissingDiscriminator)?;

    let kind: ModelType = name.parse().map_err(DecodeError::UnknownVariant)?;

    let mut body = fields.clone();
    body.remove(TYPE_FIELD);
    let body = Value::Object(body);

    let mismatch = |source: serde_json::Error| DecodeError::SchemaMismatch { kind, source };
    match kind {
        ModelType::Banner => serde_json::from_value(body)
            .map(FeedItem::Banner)
            .map_err(mismatch),
        ModelType::Product => serde_json::from_value(body)
            .map(FeedItem::Product)
            .map_err(mismatch),
    }
}

/// Decode every record independently, one outcome per input position.
pub fn decode_batch(records: &[Value]) -> Vec<std::result::Result<FeedItem, DecodeError>> {
    records.iter().map(decode_item).collect()
}

/// Split a raw feed body into its records. The body must be a JSON array.
pub fn parse_records(body: &str) -> Result<Vec<Value>> {
    match serde_json::from_str(body)? {
        Value::Array(records) => Ok(records),
        other => Err(AppError::FeedFormat(format!(
            "expected an array of records, found {}",
            json_kind(&other)
        ))),
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

#[derive(Debug)]
pub struct Rejected {
    /// Position of the record in the source batch.
    pub index: usize,
    pub error: DecodeError,
}

/// Feed ready for display: the records that decoded, in order, plus the ones
/// that were skipped.
#[derive(Debug, Default)]
pub struct DecodedFeed {
    pub items: Vec<FeedItem>,
    pub rejected: Vec<Rejected>,
}

impl DecodedFeed {
    pub fn from_records(records: &[Value]) -> Self {
        let mut feed = DecodedFeed::default();

        for (index, outcome) in decode_batch(records).into_iter().enumerate() {
            match outcome {
                Ok(item) => feed.items.push(item),
                Err(error) => {
                    tracing::warn!("Skipping feed record {}: {}", index, error);
                    feed.rejected.push(Rejected { index, error });
                }
            }
        }

        tracing::debug!(
            "Decoded {} feed items, rejected {}",
            feed.items.len(),
            feed.rejected.len()
        );
        feed
    }
}
