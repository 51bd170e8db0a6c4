pub mod cancel;
pub mod config;
pub mod error;
pub mod import;
pub mod logger;
pub mod policy;
pub mod spec;
pub mod version;

pub use cancel::CancelToken;
pub use config::{AppConfig, ConfigError};
pub use error::{classify, AppError, ErrorKind, ErrorType, ImportError};
pub use import::{ImportService, ImportServiceBuilder};
pub use logger::{Logger, NoopLogger, TracingLogger};
pub use policy::VersionPolicy;
pub use spec::{FileLoader, ImportedSpec, LoaderOptions, SpecLoad, SpecValidator};
pub use version::SpecVersion;
