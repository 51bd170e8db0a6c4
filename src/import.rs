use std::path::Path;
use std::sync::Arc;

use crate::cancel::CancelToken;
use crate::error::{AppError, ImportError};
use crate::logger::Logger;
use crate::policy::VersionPolicy;
use crate::spec::loader::{ImportedSpec, SpecLoad};

const SCOPE: &str = "import_service";

/// Application service composing the loader and the version policy: the
/// single entry point for importing an OpenAPI document.
///
/// Safe for concurrent use: each call owns its document exclusively, and the
/// only shared state (policy, logger) is read-only.
pub struct ImportService {
    loader: Box<dyn SpecLoad>,
    logger: Arc<dyn Logger>,
    policy: VersionPolicy,
}

impl std::fmt::Debug for ImportService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ImportService")
            .field("policy", &self.policy)
            .finish_non_exhaustive()
    }
}

/// Collects the service's hard dependencies. `build()` fails fast with a
/// dependency error naming the first missing collaborator; a partially
/// wired service is never constructed.
#[derive(Default)]
pub struct ImportServiceBuilder {
    loader: Option<Box<dyn SpecLoad>>,
    logger: Option<Arc<dyn Logger>>,
    policy: Option<VersionPolicy>,
}

impl ImportServiceBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn loader(mut self, loader: Box<dyn SpecLoad>) -> Self {
        self.loader = Some(loader);
        self
    }

    pub fn logger(mut self, logger: Arc<dyn Logger>) -> Self {
        self.logger = Some(logger);
        self
    }

    pub fn policy(mut self, policy: VersionPolicy) -> Self {
        self.policy = Some(policy);
        self
    }

    pub fn build(self) -> Result<ImportService, AppError> {
        let loader = self.loader.ok_or_else(|| AppError::dependency("loader"))?;
        let logger = self.logger.ok_or_else(|| AppError::dependency("logger"))?;
        let policy = self
            .policy
            .ok_or_else(|| AppError::dependency("versionPolicy"))?;
        Ok(ImportService {
            loader,
            logger,
            policy,
        })
    }
}

impl ImportService {
    pub fn builder() -> ImportServiceBuilder {
        ImportServiceBuilder::new()
    }

    /// Loads an OpenAPI spec from disk through the loader port, then enforces
    /// the configured version policy. Returns the canonical document or a
    /// classified error; cancellation propagates unchanged.
    pub fn import(&self, ctx: &CancelToken, path: &Path) -> Result<ImportedSpec, ImportError> {
        self.logger.info(
            SCOPE,
            &format!("starting to load OpenAPI spec from {}", path.display()),
        );

        let doc = self.loader.load(ctx, path).map_err(|err| {
            self.logger.error(
                SCOPE,
                &format!("failed to load OpenAPI spec from {}", path.display()),
            );
            err
        })?;

        if !self.policy.is_supported(doc.version.major()) {
            self.logger.error(
                SCOPE,
                &format!(
                    "unsupported OpenAPI version {} in {}, accepted: {}",
                    doc.version,
                    path.display(),
                    self.policy.format_versions(),
                ),
            );
            return Err(AppError::unsupported_version(
                path,
                doc.version.as_str(),
                &self.policy.supported_versions(),
            )
            .into());
        }

        self.logger.debug(SCOPE, "successfully loaded OpenAPI spec");
        Ok(doc)
    }
}
