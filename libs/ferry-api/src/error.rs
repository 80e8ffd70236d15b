use std::fmt;

use crate::schema::SchemaKind;

/// Error returned by unpackers, converters and schema builders.
///
/// Variants carry the offending schema kind and/or the runtime shape
/// descriptor (`External::type_name`) so a failure can be diagnosed without
/// looking at the value again.
#[derive(Debug, thiserror::Error)]
pub enum ConvertError {
    #[error("unrecognized bytes representation: {0}")]
    UnrecognizedBytesRepresentation(&'static str),

    #[error("unrecognized array representation: {0}")]
    UnrecognizedArrayRepresentation(&'static str),

    #[error("unrecognized map representation: {0}")]
    UnrecognizedMapRepresentation(&'static str),

    #[error("unrecognized record representation: {0}")]
    UnrecognizedRecordRepresentation(&'static str),

    #[error("map key of type {0} has no textual form")]
    UnrecognizedMapKey(&'static str),

    #[error("missing field '{0}'")]
    MissingField(String),

    #[error("positional record has {actual} values, schema declares {expected} fields")]
    RecordArityMismatch { expected: usize, actual: usize },

    #[error("fixed length mismatch: expected {expected} bytes, got {actual}")]
    FixedLengthMismatch { expected: usize, actual: usize },

    #[error("ambiguous union branch for {shape}: candidates {candidates:?}")]
    AmbiguousUnionBranch {
        shape: &'static str,
        candidates: Vec<String>,
    },

    #[error("no union branch matches {shape}: branches {branches:?}")]
    NoMatchingUnionBranch {
        shape: &'static str,
        branches: Vec<String>,
    },

    #[error("unknown schema kind: {0}")]
    UnknownSchemaKind(String),

    #[error("{kind} schema cannot accept {shape}")]
    UnexpectedShape { kind: SchemaKind, shape: &'static str },

    #[error("value of type {0} cannot be described as text")]
    NotDescribable(&'static str),

    #[error("invalid buffer window: position {position}, limit {limit}, capacity {capacity}")]
    InvalidBufferWindow {
        position: usize,
        limit: usize,
        capacity: usize,
    },

    #[error("invalid schema: {0}")]
    InvalidSchema(String),

    #[error("no schema available for {0}")]
    MissingSchema(&'static str),

    #[error("symbol '{symbol}' is not declared by enum {name}")]
    UnknownEnumSymbol { name: String, symbol: String },

    #[error("config error: {0}")]
    Config(String),

    #[error("format error: {0}")]
    Format(String),

    #[error("{context}: {source}")]
    Context {
        context: String,
        #[source]
        source: Box<ConvertError>,
    },
}

impl ConvertError {
    /// Add context to the error (`"context: original message"`).
    ///
    /// The original variant stays reachable through [`root_cause`](Self::root_cause).
    pub fn with_context(self, ctx: impl fmt::Display) -> Self {
        ConvertError::Context {
            context: ctx.to_string(),
            source: Box::new(self),
        }
    }

    /// Innermost error, with every `Context` layer peeled off.
    pub fn root_cause(&self) -> &ConvertError {
        let mut current = self;
        while let ConvertError::Context { source, .. } = current {
            current = source;
        }
        current
    }

    /// Context layers from the outermost to the innermost, e.g.
    /// `["field 'items'", "item 2"]`.
    pub fn path(&self) -> Vec<&str> {
        let mut path = Vec::new();
        let mut current = self;
        while let ConvertError::Context { context, source } = current {
            path.push(context.as_str());
            current = source;
        }
        path
    }
}

/// Extension for attaching context to `Result<_, ConvertError>`.
pub trait ResultExt<T> {
    fn context(self, ctx: impl fmt::Display) -> Result<T, ConvertError>;
}

impl<T> ResultExt<T> for Result<T, ConvertError> {
    fn context(self, ctx: impl fmt::Display) -> Result<T, ConvertError> {
        self.map_err(|e| e.with_context(ctx))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn context_layers_keep_root_cause() {
        let err = ConvertError::MissingField("id".into())
            .with_context("item 2")
            .with_context("field 'items'");

        assert!(matches!(err.root_cause(), ConvertError::MissingField(name) if name == "id"));
        assert_eq!(err.path(), vec!["field 'items'", "item 2"]);
        assert_eq!(err.to_string(), "field 'items': item 2: missing field 'id'");
    }

    #[test]
    fn result_ext_wraps_only_errors() {
        let ok: Result<u8, ConvertError> = Ok(1);
        assert_eq!(ok.context("unused").unwrap(), 1);

        let err: Result<u8, ConvertError> = Err(ConvertError::UnrecognizedMapKey("buffer"));
        let err = err.context("key #0").unwrap_err();
        assert_eq!(err.path(), vec!["key #0"]);
    }
}
