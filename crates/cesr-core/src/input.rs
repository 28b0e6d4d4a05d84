//! Stream input normalisation.

use serde_json::Value;

use crate::error::CesrError;

/// Borrowed CESR input; decoding always works on the byte view.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Input<'a> {
    Text(&'a str),
    Bytes(&'a [u8]),
}

impl<'a> Input<'a> {
    pub fn as_bytes(&self) -> &'a [u8] {
        match *self {
            Input::Text(text) => text.as_bytes(),
            Input::Bytes(bytes) => bytes,
        }
    }
}

impl<'a> From<&'a str> for Input<'a> {
    fn from(text: &'a str) -> Self {
        Input::Text(text)
    }
}

impl<'a> From<&'a String> for Input<'a> {
    fn from(text: &'a String) -> Self {
        Input::Text(text)
    }
}

impl<'a> From<&'a [u8]> for Input<'a> {
    fn from(bytes: &'a [u8]) -> Self {
        Input::Bytes(bytes)
    }
}

impl<'a> From<&'a Vec<u8>> for Input<'a> {
    fn from(bytes: &'a Vec<u8>) -> Self {
        Input::Bytes(bytes)
    }
}

/// Owned counterpart of [`Input`], for callers holding dynamically typed values.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OwnedInput {
    Text(String),
    Bytes(Vec<u8>),
}

impl OwnedInput {
    pub fn as_input(&self) -> Input<'_> {
        match self {
            OwnedInput::Text(text) => Input::Text(text),
            OwnedInput::Bytes(bytes) => Input::Bytes(bytes),
        }
    }
}

/// A JSON string becomes text, an array of byte-valued numbers becomes bytes.
impl TryFrom<&Value> for OwnedInput {
    type Error = CesrError;

    fn try_from(value: &Value) -> Result<Self, Self::Error> {
        match value {
            Value::String(text) => Ok(OwnedInput::Text(text.clone())),
            Value::Array(items) => items
                .iter()
                .enumerate()
                .map(|(i, item)| {
                    item.as_u64()
                        .and_then(|n| u8::try_from(n).ok())
                        .ok_or_else(|| CesrError::InvalidArgument {
                            reason: format!("element {i} is not a byte: {item}"),
                        })
                })
                .collect::<Result<Vec<u8>, _>>()
                .map(OwnedInput::Bytes),
            other => Err(CesrError::InvalidArgument {
                reason: format!("expected text or bytes, got {}", kind_of(other)),
            }),
        }
    }
}

fn kind_of(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
