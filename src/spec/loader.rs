use std::fs;
use std::path::Path;
use std::sync::Arc;

use openapiv3::OpenAPI;

use crate::cancel::CancelToken;
use crate::error::{classify, detail, AppError, ErrorKind, ImportError};
use crate::spec::validator::{find_external_ref, SpecCheckError, SpecValidator, StructuralValidator};
use crate::version::SpecVersion;

/// Normalized representation returned by loaders.
///
/// - `json`: canonical UTF-8 JSON of the document (source may be YAML/JSON).
/// - `version`: the declared version from the `openapi` field (e.g. "3.0.3").
#[derive(Debug, Clone)]
pub struct ImportedSpec {
    pub json: Vec<u8>,
    pub version: SpecVersion,
}

/// Output port for fetching an OpenAPI document from disk.
pub trait SpecLoad: Send + Sync {
    fn load(&self, ctx: &CancelToken, path: &Path) -> Result<ImportedSpec, ImportError>;
}

/// Construction-time behavior flags for [`FileLoader`].
#[derive(Debug, Clone, Copy)]
pub struct LoaderOptions {
    /// Whether `$ref` targets outside the document are tolerated.
    /// Off by default for security/portability; enabling it only skips the
    /// reference scan — targets are left unresolved in the canonical JSON.
    pub allow_external_refs: bool,
}

impl Default for LoaderOptions {
    fn default() -> Self {
        Self {
            allow_external_refs: false,
        }
    }
}

/// Reads, parses and validates an OpenAPI file, centralizing the error
/// normalization policy: every failure leaving this type is a classified
/// `AppError` (or a cancellation signal, passed through untouched).
pub struct FileLoader {
    validator: Arc<dyn SpecValidator>,
    options: LoaderOptions,
}

impl FileLoader {
    /// Builds a loader with safe defaults: structural validation on, external
    /// `$ref` resolution off.
    pub fn new() -> Self {
        Self::with_validator(Arc::new(StructuralValidator), LoaderOptions::default())
    }

    pub fn with_options(options: LoaderOptions) -> Self {
        Self::with_validator(Arc::new(StructuralValidator), options)
    }

    pub fn with_validator(validator: Arc<dyn SpecValidator>, options: LoaderOptions) -> Self {
        Self { validator, options }
    }
}

impl Default for FileLoader {
    fn default() -> Self {
        Self::new()
    }
}

impl SpecLoad for FileLoader {
    fn load(&self, ctx: &CancelToken, path: &Path) -> Result<ImportedSpec, ImportError> {
        if ctx.is_cancelled() {
            return Err(ImportError::Cancelled);
        }

        let raw = fs::read_to_string(path).map_err(|e| classify(path, Box::new(e)))?;

        // serde_yaml accepts JSON input as well; one parse path covers both
        // source syntaxes.
        let doc: OpenAPI =
            serde_yaml::from_str(&raw).map_err(|e| classify(path, Box::new(e)))?;

        if ctx.is_cancelled() {
            return Err(ImportError::Cancelled);
        }

        let doc_value =
            serde_json::to_value(&doc).map_err(|e| internal_error(path, Box::new(e)))?;

        if !self.options.allow_external_refs {
            if let Some(reference) = find_external_ref(&doc_value) {
                let check_err = SpecCheckError::ExternalReference {
                    reference: reference.to_string(),
                };
                return Err(check_error_to_app(path, check_err).into());
            }
        }

        if let Err(e) = self.validator.validate(&doc) {
            return Err(check_error_to_app(path, e).into());
        }

        let version = SpecVersion::new(doc.openapi.clone());
        if !version.is_valid() {
            let cause = format!("got {:?}, expected format X.Y[.Z]", doc.openapi);
            return Err(AppError::validation(
                ErrorKind::InvalidVersionFormat,
                "Invalid OpenAPI version format",
                Some(cause.into()),
            )
            .with_detail(detail::FILE, path.to_string_lossy().into_owned())
            .with_detail(detail::VERSION, doc.openapi.clone())
            .into());
        }

        let json =
            serde_json::to_vec(&doc_value).map_err(|e| internal_error(path, Box::new(e)))?;

        Ok(ImportedSpec { json, version })
    }
}

/// Exhaustive mapping from the validator's structured result into the
/// taxonomy. New `SpecCheckError` variants fail compilation here until a
/// kind is chosen for them.
fn check_error_to_app(path: &Path, err: SpecCheckError) -> AppError {
    let (kind, message) = match &err {
        SpecCheckError::ExternalReference { .. } => (
            ErrorKind::ExternalRefNotAllowed,
            "External references are not allowed",
        ),
        SpecCheckError::Invalid(_) => (ErrorKind::InvalidSpec, "Invalid OpenAPI specification"),
    };
    AppError::validation(kind, message, Some(Box::new(err)))
        .with_detail(detail::FILE, path.to_string_lossy().into_owned())
}

/// Serialization of an already-validated document should not fail; when it
/// does, the failure is still surfaced through the taxonomy rather than
/// silently dropped.
fn internal_error(
    path: &Path,
    err: Box<dyn std::error::Error + Send + Sync>,
) -> AppError {
    AppError::validation(
        ErrorKind::InternalError,
        "Internal error while importing specification",
        Some(err),
    )
    .with_detail(detail::FILE, path.to_string_lossy().into_owned())
}
