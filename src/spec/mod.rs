pub mod loader;
pub mod validator;

pub use loader::{FileLoader, ImportedSpec, LoaderOptions, SpecLoad};
pub use validator::{SpecCheckError, SpecValidator, StructuralValidator};
