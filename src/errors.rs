use serde::Serialize;
use serde_json::{json, Value};
use thiserror::Error;

/// Stable classification of every failure the lookup engine can raise.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum ErrorKind {
    PathNotFound,
    PrimitiveEncounteredMidPath,
    IndexOutOfRange,
    NullValueEncountered,
    TypeMismatch,
    ConfigurationError,
    InvalidPath,
    ValueConversion,
}

impl ErrorKind {
    /// The machine-matchable code handed to API consumers.
    pub fn code(self) -> &'static str {
        match self {
            ErrorKind::PathNotFound => "automation.providers.path.not.found",
            ErrorKind::PrimitiveEncounteredMidPath => {
                "automation.providers.path.resolves.to.primitive.when.object.or.array.expected"
            }
            ErrorKind::IndexOutOfRange => "automation.providers.path.index.out.of.range",
            ErrorKind::NullValueEncountered => "automation.providers.path.query.value.if.null",
            ErrorKind::TypeMismatch => "automation.providers.path.query.value.invalid.type",
            ErrorKind::ConfigurationError => "automation.providers.configuration.error",
            ErrorKind::InvalidPath => "automation.providers.path.invalid",
            ErrorKind::ValueConversion => "automation.providers.value.conversion.failed",
        }
    }

    pub fn title(self) -> &'static str {
        match self {
            ErrorKind::PathNotFound => "Path not found",
            ErrorKind::PrimitiveEncounteredMidPath => "Path resolves to a primitive value",
            ErrorKind::IndexOutOfRange => "Path index out of range",
            ErrorKind::NullValueEncountered => "Path query value is null",
            ErrorKind::TypeMismatch => "Path query value has an invalid type",
            ErrorKind::ConfigurationError => "Invalid provider configuration",
            ErrorKind::InvalidPath => "Invalid path",
            ErrorKind::ValueConversion => "Value conversion failed",
        }
    }

    /// Whether a `LookupPolicy` may substitute a fallback for this failure.
    pub fn is_policy_governed(self) -> bool {
        matches!(
            self,
            ErrorKind::PathNotFound | ErrorKind::NullValueEncountered | ErrorKind::TypeMismatch
        )
    }
}

/// Diagnostic payload attached to every raised error.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ErrorData {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tenant: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub schema_reference_key: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expected_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub actual_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub index: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub length: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
}

impl ErrorData {
    pub fn with_path(mut self, path: impl Into<String>) -> Self {
        self.path = Some(path.into());
        self
    }

    pub fn with_types(mut self, actual: impl Into<String>, expected: impl Into<String>) -> Self {
        self.actual_type = Some(actual.into());
        self.expected_type = Some(expected.into());
        self
    }

    pub fn with_reason(mut self, reason: impl Into<String>) -> Self {
        self.reason = Some(reason.into());
        self
    }
}

/// Errors raised by path lookups and providers.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum LookupError {
    #[error("no value was found at path `{}`", path_of(.0))]
    PathNotFound(ErrorData),

    #[error("path `{}` reached a primitive value where an object or array was expected", path_of(.0))]
    PrimitiveEncounteredMidPath(ErrorData),

    #[error("index {} at path `{}` is out of range for length {}", .0.index.unwrap_or_default(), path_of(.0), .0.length.unwrap_or_default())]
    IndexOutOfRange(ErrorData),

    #[error("the value at path `{}` is null", path_of(.0))]
    NullValueEncountered(ErrorData),

    #[error(
        "the value at path `{}` is of type `{}` but `{}` was expected",
        path_of(.0),
        .0.actual_type.as_deref().unwrap_or("unknown"),
        .0.expected_type.as_deref().unwrap_or("unknown")
    )]
    TypeMismatch(ErrorData),

    #[error("configuration error: {}", .0.reason.as_deref().unwrap_or("invalid provider configuration"))]
    Configuration(ErrorData),

    #[error("invalid path: {}", .0.reason.as_deref().unwrap_or("unparseable path"))]
    InvalidPath(ErrorData),

    #[error("value conversion failed: {}", .0.reason.as_deref().unwrap_or("unsupported value"))]
    ValueConversion(ErrorData),
}

fn path_of(data: &ErrorData) -> &str {
    data.path.as_deref().unwrap_or("")
}

impl LookupError {
    pub fn new(kind: ErrorKind, data: ErrorData) -> Self {
        match kind {
            ErrorKind::PathNotFound => LookupError::PathNotFound(data),
            ErrorKind::PrimitiveEncounteredMidPath => LookupError::PrimitiveEncounteredMidPath(data),
            ErrorKind::IndexOutOfRange => LookupError::IndexOutOfRange(data),
            ErrorKind::NullValueEncountered => LookupError::NullValueEncountered(data),
            ErrorKind::TypeMismatch => LookupError::TypeMismatch(data),
            ErrorKind::ConfigurationError => LookupError::Configuration(data),
            ErrorKind::InvalidPath => LookupError::InvalidPath(data),
            ErrorKind::ValueConversion => LookupError::ValueConversion(data),
        }
    }

    pub fn type_mismatch(
        path: impl Into<String>,
        actual: impl Into<String>,
        expected: impl Into<String>,
    ) -> Self {
        LookupError::TypeMismatch(ErrorData::default().with_path(path).with_types(actual, expected))
    }

    pub fn configuration(reason: impl Into<String>) -> Self {
        LookupError::Configuration(ErrorData::default().with_reason(reason))
    }

    pub fn conversion(reason: impl Into<String>) -> Self {
        LookupError::ValueConversion(ErrorData::default().with_reason(reason))
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            LookupError::PathNotFound(_) => ErrorKind::PathNotFound,
            LookupError::PrimitiveEncounteredMidPath(_) => ErrorKind::PrimitiveEncounteredMidPath,
            LookupError::IndexOutOfRange(_) => ErrorKind::IndexOutOfRange,
            LookupError::NullValueEncountered(_) => ErrorKind::NullValueEncountered,
            LookupError::TypeMismatch(_) => ErrorKind::TypeMismatch,
            LookupError::Configuration(_) => ErrorKind::ConfigurationError,
            LookupError::InvalidPath(_) => ErrorKind::InvalidPath,
            LookupError::ValueConversion(_) => ErrorKind::ValueConversion,
        }
    }

    pub fn code(&self) -> &'static str {
        self.kind().code()
    }

    pub fn data(&self) -> &ErrorData {
        match self {
            LookupError::PathNotFound(d)
            | LookupError::PrimitiveEncounteredMidPath(d)
            | LookupError::IndexOutOfRange(d)
            | LookupError::NullValueEncountered(d)
            | LookupError::TypeMismatch(d)
            | LookupError::Configuration(d)
            | LookupError::InvalidPath(d)
            | LookupError::ValueConversion(d) => d,
        }
    }

    fn data_mut(&mut self) -> &mut ErrorData {
        match self {
            LookupError::PathNotFound(d)
            | LookupError::PrimitiveEncounteredMidPath(d)
            | LookupError::IndexOutOfRange(d)
            | LookupError::NullValueEncountered(d)
            | LookupError::TypeMismatch(d)
            | LookupError::Configuration(d)
            | LookupError::InvalidPath(d)
            | LookupError::ValueConversion(d) => d,
        }
    }

    /// Fill in lookup context that the raising site did not know about.
    /// Fields already set are left untouched.
    pub fn with_context(
        mut self,
        tenant: Option<&str>,
        schema_reference_key: Option<&str>,
        path: Option<&str>,
    ) -> Self {
        let data = self.data_mut();
        if data.tenant.is_none() {
            data.tenant = tenant.map(str::to_owned);
        }
        if data.schema_reference_key.is_none() {
            data.schema_reference_key = schema_reference_key.map(str::to_owned);
        }
        if data.path.is_none() {
            data.path = path.map(str::to_owned);
        }
        self
    }

    /// The error document returned to API consumers.
    pub fn to_json(&self) -> Value {
        json!({
            "code": self.code(),
            "title": self.kind().title(),
            "message": self.to_string(),
            "data": self.data(),
        })
    }
}

// Type alias for results that use `LookupError` as the error type
pub type Result<T> = std::result::Result<T, LookupError>;

/// Syntax errors from the path parser. Converted to `LookupError::InvalidPath`
/// before leaving the crate.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ParseError {
    #[error("invalid syntax: {0}")]
    InvalidSyntax(String),
}

impl From<String> for ParseError {
    fn from(msg: String) -> Self {
        ParseError::InvalidSyntax(msg)
    }
}
