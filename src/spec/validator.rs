use std::collections::HashSet;

use openapiv3::OpenAPI;
use serde_json::Value;
use thiserror::Error;

/// Structured outcome of structural validation.
///
/// Variants are deliberately enumerated (rather than free-text errors) so the
/// loader's mapping into the error taxonomy is exhaustive by construction.
#[derive(Debug, Error)]
pub enum SpecCheckError {
    #[error("external reference {reference:?} is not allowed")]
    ExternalReference { reference: String },

    #[error("invalid specification: {0}")]
    Invalid(String),
}

/// Boundary to the structural validation capability.
///
/// The import flow treats the validator as opaque: it only consumes the
/// structured `SpecCheckError` result. Swapping in a richer validator does
/// not touch the loader or the service.
pub trait SpecValidator: Send + Sync {
    fn validate(&self, doc: &OpenAPI) -> Result<(), SpecCheckError>;
}

/// Default validator covering the structural checks the import flow relies
/// on: a declared version, a titled info block, well-formed path templates
/// and unique operation ids.
#[derive(Debug, Default, Clone, Copy)]
pub struct StructuralValidator;

impl SpecValidator for StructuralValidator {
    fn validate(&self, doc: &OpenAPI) -> Result<(), SpecCheckError> {
        if doc.openapi.trim().is_empty() {
            return Err(SpecCheckError::Invalid(
                "missing required field: openapi".to_string(),
            ));
        }
        if doc.info.title.trim().is_empty() {
            return Err(SpecCheckError::Invalid(
                "missing required field: info.title".to_string(),
            ));
        }

        let mut seen_ids = HashSet::new();
        for (path, item_ref) in &doc.paths.paths {
            if !path.starts_with('/') {
                return Err(SpecCheckError::Invalid(format!(
                    "path {path:?} must start with '/'"
                )));
            }

            let Some(item) = item_ref.as_item() else {
                // Path-level $ref targets are checked by the reference scan.
                continue;
            };
            for (method, operation) in item.iter() {
                if let Some(id) = &operation.operation_id {
                    if !seen_ids.insert(id.clone()) {
                        return Err(SpecCheckError::Invalid(format!(
                            "duplicate operationId {id:?} at {} {path}",
                            method.to_uppercase(),
                        )));
                    }
                }
            }
        }

        Ok(())
    }
}

/// Depth-first scan for the first `$ref` pointing outside the document
/// (anything not starting with `#`). Runs on the serialized form so every
/// nesting level is covered uniformly.
pub fn find_external_ref(value: &Value) -> Option<&str> {
    match value {
        Value::Object(map) => {
            if let Some(Value::String(target)) = map.get("$ref") {
                if !target.starts_with('#') {
                    return Some(target);
                }
            }
            map.values().find_map(find_external_ref)
        }
        Value::Array(items) => items.iter().find_map(find_external_ref),
        _ => None,
    }
}
