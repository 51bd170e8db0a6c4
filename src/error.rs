use std::collections::BTreeMap;
use std::error::Error;
use std::fmt;
use std::io;
use std::path::Path;

use serde::Serialize;
use serde_json::Value;
use thiserror::Error;

/// Broad error category: `Validation` is caller-fixable (bad input/spec),
/// `Dependency` is a construction-time misconfiguration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ErrorType {
    Validation,
    Dependency,
}

impl ErrorType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Validation => "validation",
            Self::Dependency => "dependency",
        }
    }
}

impl fmt::Display for ErrorType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Machine-branchable classification of import/validation failures.
/// Keep values stable: callers rely on these identifiers for branching
/// and telemetry, not just display.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    /// The path does not exist on disk.
    FileNotFound,
    /// The process lacks permissions to read the file.
    PermissionDenied,
    /// YAML/JSON parsing failed.
    InvalidSyntax,
    /// The document uses external `$ref` while resolution is disabled.
    ExternalRefNotAllowed,
    /// The document is semantically invalid per the structural validator.
    InvalidSpec,
    /// The declared `openapi` version is not of the form X.Y[.Z].
    InvalidVersionFormat,
    /// Catch-all for failures not attributable to user input.
    /// Prefer more specific kinds whenever possible.
    InternalError,
}

impl ErrorKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::FileNotFound => "file_not_found",
            Self::PermissionDenied => "permission_denied",
            Self::InvalidSyntax => "invalid_syntax",
            Self::ExternalRefNotAllowed => "external_ref_not_allowed",
            Self::InvalidSpec => "invalid_spec",
            Self::InvalidVersionFormat => "invalid_version_format",
            Self::InternalError => "internal_error",
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Reserved detail keys for consistent logging/telemetry.
pub mod detail {
    pub const FILE: &str = "file";
    pub const KIND: &str = "kind";
    pub const VERSION: &str = "version";
    pub const COMPONENT: &str = "component";
    pub const EXPECTED: &str = "expected";
}

type BoxError = Box<dyn Error + Send + Sync + 'static>;

/// Central application error.
///
/// - `message`: stable, user-facing summary.
/// - `details`: structured context (use the reserved keys when applicable).
/// - `source`: wrapped technical cause, exposed through `Error::source()`;
///   diagnostic only, not part of the stable contract.
#[derive(Debug)]
pub struct AppError {
    pub error_type: ErrorType,
    pub message: String,
    pub details: BTreeMap<String, Value>,
    source: Option<BoxError>,
}

impl Error for AppError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        self.source.as_deref().map(|e| e as &(dyn Error + 'static))
    }
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.source {
            None => write!(f, "[{}] {}", self.error_type, self.message),
            Some(cause) => write!(f, "[{}] {}: {}", self.error_type, self.message, cause),
        }
    }
}

impl AppError {
    /// Creates a validation error with a machine-readable kind.
    pub fn validation(
        kind: ErrorKind,
        message: impl Into<String>,
        source: Option<BoxError>,
    ) -> Self {
        let mut details = BTreeMap::new();
        details.insert(detail::KIND.to_string(), Value::from(kind.as_str()));
        Self {
            error_type: ErrorType::Validation,
            message: message.into(),
            details,
            source,
        }
    }

    /// Builds a standardized dependency error for a missing collaborator.
    /// Raised only at composition time; fatal to construction.
    pub fn dependency(component: &str) -> Self {
        let mut details = BTreeMap::new();
        details.insert(detail::COMPONENT.to_string(), Value::from(component));
        Self {
            error_type: ErrorType::Dependency,
            message: "Missing required dependency".to_string(),
            details,
            source: Some(format!("dependency {component:?} is required").into()),
        }
    }

    /// Builds a validation error for a version that parsed correctly but is
    /// outside the accepted majors. Distinct from `InvalidVersionFormat`.
    pub fn unsupported_version(file: &Path, got: &str, expected: &[u32]) -> Self {
        let rendered = expected
            .iter()
            .map(|m| format!("{m}.x"))
            .collect::<Vec<_>>()
            .join(", ");
        let mut err = Self {
            error_type: ErrorType::Validation,
            message: "Unsupported OpenAPI version".to_string(),
            details: BTreeMap::new(),
            source: Some(format!("got {got}, expected one of: {rendered}").into()),
        };
        err.details.insert(detail::FILE.to_string(), path_value(file));
        err.details
            .insert(detail::VERSION.to_string(), Value::from(got));
        err.details
            .insert(detail::EXPECTED.to_string(), Value::from(expected.to_vec()));
        err
    }

    /// Attaches or replaces a structured detail, consuming self.
    pub fn with_detail(mut self, key: &str, value: impl Into<Value>) -> Self {
        self.details.insert(key.to_string(), value.into());
        self
    }

    /// The `kind` detail, when present.
    pub fn kind(&self) -> Option<&str> {
        self.details.get(detail::KIND).and_then(Value::as_str)
    }

    /// The `file` detail, when present.
    pub fn file(&self) -> Option<&str> {
        self.details.get(detail::FILE).and_then(Value::as_str)
    }
}

fn path_value(path: &Path) -> Value {
    Value::from(path.to_string_lossy().into_owned())
}

/// Maps heterogeneous errors (io, YAML/JSON parsing, validator output) into
/// the stable `AppError` shape with a machine-friendly `kind` detail.
///
/// This function MUST remain deterministic: callers rely on `kind` for UX
/// messages, branching logic and telemetry. Classification order, first
/// match wins:
/// 1. already an `AppError` — backfill a missing `file` detail, pass
///    through unchanged, never re-classify;
/// 2. OS-level io conditions (not found, permission);
/// 3. typed parser errors (serde_yaml/serde_json) are syntax errors;
/// 4. recognizable vendor message substrings (last-line defense for opaque
///    third-party error text);
/// 5. anything else is an invalid spec.
pub fn classify(path: &Path, err: BoxError) -> AppError {
    let err = match err.downcast::<AppError>() {
        Ok(mut app) => {
            app.details
                .entry(detail::FILE.to_string())
                .or_insert_with(|| path_value(path));
            return *app;
        }
        Err(err) => err,
    };

    if let Some(io_err) = err.downcast_ref::<io::Error>() {
        match io_err.kind() {
            io::ErrorKind::NotFound => {
                return AppError::validation(ErrorKind::FileNotFound, "File not found", Some(err))
                    .with_detail(detail::FILE, path_value(path));
            }
            io::ErrorKind::PermissionDenied => {
                return AppError::validation(
                    ErrorKind::PermissionDenied,
                    "Permission denied",
                    Some(err),
                )
                .with_detail(detail::FILE, path_value(path));
            }
            _ => {}
        }
    }

    if err.is::<serde_yaml::Error>() || err.is::<serde_json::Error>() {
        return AppError::validation(ErrorKind::InvalidSyntax, "Invalid YAML/JSON syntax", Some(err))
            .with_detail(detail::FILE, path_value(path));
    }

    let msg = err.to_string();
    if msg.contains("yaml:") || msg.contains("json:") {
        return AppError::validation(ErrorKind::InvalidSyntax, "Invalid YAML/JSON syntax", Some(err))
            .with_detail(detail::FILE, path_value(path));
    }
    if msg.contains("external reference") {
        return AppError::validation(
            ErrorKind::ExternalRefNotAllowed,
            "External references are not allowed",
            Some(err),
        )
        .with_detail(detail::FILE, path_value(path));
    }

    AppError::validation(
        ErrorKind::InvalidSpec,
        "Invalid OpenAPI specification",
        Some(err),
    )
    .with_detail(detail::FILE, path_value(path))
}

/// Result of a failed import attempt: either a classified failure or a
/// cancellation signal from the caller.
///
/// Cancellation is control flow, not a data-validation outcome; it bypasses
/// `classify` entirely and is never given a `kind`.
#[derive(Debug, Error)]
pub enum ImportError {
    #[error("import cancelled by caller")]
    Cancelled,
    #[error(transparent)]
    App(#[from] AppError),
}

impl ImportError {
    /// The classified error, unless this is a cancellation signal.
    pub fn as_app(&self) -> Option<&AppError> {
        match self {
            Self::App(err) => Some(err),
            Self::Cancelled => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn path() -> PathBuf {
        PathBuf::from("/tmp/spec.yaml")
    }

    #[test]
    fn classifies_not_found() {
        let io_err = io::Error::new(io::ErrorKind::NotFound, "no such file");
        let err = classify(&path(), Box::new(io_err));
        assert_eq!(err.error_type, ErrorType::Validation);
        assert_eq!(err.kind(), Some("file_not_found"));
        assert_eq!(err.file(), Some("/tmp/spec.yaml"));
        assert!(err.source().is_some());
    }

    #[test]
    fn classifies_permission_denied() {
        let io_err = io::Error::new(io::ErrorKind::PermissionDenied, "denied");
        let err = classify(&path(), Box::new(io_err));
        assert_eq!(err.kind(), Some("permission_denied"));
    }

    #[test]
    fn classifies_vendor_yaml_message() {
        let err = classify(&path(), "yaml: line 3: mapping values".into());
        assert_eq!(err.kind(), Some("invalid_syntax"));
        assert_eq!(err.message, "Invalid YAML/JSON syntax");
    }

    #[test]
    fn classifies_typed_parser_errors_as_syntax() {
        let yaml_err = serde_yaml::from_str::<Value>("a: [unclosed").unwrap_err();
        let err = classify(&path(), Box::new(yaml_err));
        assert_eq!(err.kind(), Some("invalid_syntax"));

        let json_err = serde_json::from_str::<Value>("{ nope").unwrap_err();
        let err = classify(&path(), Box::new(json_err));
        assert_eq!(err.kind(), Some("invalid_syntax"));
    }

    #[test]
    fn classifies_vendor_external_ref_message() {
        let err = classify(&path(), "encountered disallowed external reference".into());
        assert_eq!(err.kind(), Some("external_ref_not_allowed"));
    }

    #[test]
    fn falls_back_to_invalid_spec() {
        let err = classify(&path(), "something went sideways".into());
        assert_eq!(err.kind(), Some("invalid_spec"));
        assert_eq!(err.message, "Invalid OpenAPI specification");
    }

    #[test]
    fn classification_is_idempotent() {
        let first = classify(&path(), "yaml: bad indent".into());
        let second = classify(&path(), Box::new(first));
        assert_eq!(second.kind(), Some("invalid_syntax"));
        // Not double-wrapped: the cause is still the vendor error.
        assert_eq!(second.source().unwrap().to_string(), "yaml: bad indent");
    }

    #[test]
    fn passthrough_backfills_missing_file() {
        let bare = AppError::validation(ErrorKind::InvalidVersionFormat, "Invalid format", None);
        assert_eq!(bare.file(), None);
        let enriched = classify(&path(), Box::new(bare));
        assert_eq!(enriched.file(), Some("/tmp/spec.yaml"));
        assert_eq!(enriched.kind(), Some("invalid_version_format"));
    }

    #[test]
    fn passthrough_keeps_existing_file() {
        let err = AppError::validation(ErrorKind::InvalidSpec, "Invalid", None)
            .with_detail(detail::FILE, "/other/spec.json");
        let out = classify(&path(), Box::new(err));
        assert_eq!(out.file(), Some("/other/spec.json"));
    }

    #[test]
    fn dependency_error_names_component() {
        let err = AppError::dependency("logger");
        assert_eq!(err.error_type, ErrorType::Dependency);
        assert_eq!(
            err.details.get(detail::COMPONENT).and_then(Value::as_str),
            Some("logger")
        );
    }

    #[test]
    fn unsupported_version_carries_expected_majors() {
        let err = AppError::unsupported_version(&path(), "2.0", &[3, 4]);
        assert_eq!(err.error_type, ErrorType::Validation);
        assert_eq!(
            err.details.get(detail::VERSION).and_then(Value::as_str),
            Some("2.0")
        );
        assert_eq!(
            err.details.get(detail::EXPECTED).cloned(),
            Some(Value::from(vec![3u32, 4]))
        );
        assert!(err.source().unwrap().to_string().contains("3.x, 4.x"));
    }

    #[test]
    fn display_includes_type_and_cause() {
        let err = classify(&path(), "yaml: oops".into());
        let rendered = err.to_string();
        assert!(rendered.starts_with("[validation] Invalid YAML/JSON syntax"));
        assert!(rendered.contains("yaml: oops"));
    }
}
