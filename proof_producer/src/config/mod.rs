//! Layered configuration resolution.
//!
//! Configuration units ("aspects") contribute typed option descriptors
//! to two independent schemas (CLI and config file). The
//! [`Configurator`] parses real input against those schemas, merges
//! the results with CLI > file > default precedence, and hands the
//! merged map back to every aspect's `initialize`.

pub mod aspect;
pub mod options;
pub mod resolver;

pub use aspect::{build_schemas, initialize_aspects, Aspect, InitializeAspect};
pub use options::{OptionDescriptor, OptionKind, OptionSchema, OptionValue, SchemaError, SchemaResult};
pub use resolver::{ConfigError, Configurator, MergedValues, ResolvedValues};
