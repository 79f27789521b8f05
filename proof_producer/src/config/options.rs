//! Option descriptor model: pure data describing one named, typed
//! option, and the ordered schema accumulating them.

use thiserror::Error;

/// Stores the result of schema construction. Returns a [`SchemaError`]
/// upon failure.
pub type SchemaResult<T> = Result<T, SchemaError>;

/// An error raised while assembling an option schema. These are
/// programming errors (conflicting aspect contributions), not input
/// errors, and are rejected before any parsing happens.
#[derive(Clone, Debug, Eq, Error, Hash, PartialEq)]
pub enum SchemaError {
    /// Two descriptors with the same name were contributed to the same
    /// schema.
    #[error("option `{0}` was declared twice in the same schema")]
    DuplicateOption(String),
}

/// The value shape an option accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OptionKind {
    /// `--name <string>` / `name=<string>`.
    Str,
    /// `--name <integer>` / `name=<integer>`.
    Int,
    /// Presence flag: `--name` with no value.
    Flag,
}

/// A parsed or defaulted option value. Flags carry no payload; their
/// presence in a value map is the information.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OptionValue {
    Str(String),
    Int(i64),
    Flag,
}

impl OptionValue {
    pub fn as_str(&self) -> Option<&str> {
        match self {
            OptionValue::Str(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_int(&self) -> Option<i64> {
        match self {
            OptionValue::Int(i) => Some(*i),
            _ => None,
        }
    }

    /// The [`OptionKind`] this value satisfies.
    pub fn kind(&self) -> OptionKind {
        match self {
            OptionValue::Str(_) => OptionKind::Str,
            OptionValue::Int(_) => OptionKind::Int,
            OptionValue::Flag => OptionKind::Flag,
        }
    }
}

/// Declaration of a single option: identity is `name`, unique within a
/// schema. The short flag only applies to CLI parsing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OptionDescriptor {
    pub name: String,
    pub short: Option<char>,
    pub kind: OptionKind,
    pub default: Option<OptionValue>,
    pub help: String,
}

impl OptionDescriptor {
    pub fn string(name: &str, help: &str) -> Self {
        Self::new(name, OptionKind::Str, help)
    }

    pub fn int(name: &str, help: &str) -> Self {
        Self::new(name, OptionKind::Int, help)
    }

    pub fn flag(name: &str, help: &str) -> Self {
        Self::new(name, OptionKind::Flag, help)
    }

    fn new(name: &str, kind: OptionKind, help: &str) -> Self {
        Self {
            name: name.to_string(),
            short: None,
            kind,
            default: None,
            help: help.to_string(),
        }
    }

    pub fn with_short(mut self, short: char) -> Self {
        self.short = Some(short);
        self
    }

    /// Attaches a built-in default, applied when neither the CLI nor
    /// the config file set the option. The default must match the
    /// descriptor's kind.
    pub fn with_default(mut self, default: OptionValue) -> Self {
        debug_assert_eq!(default.kind(), self.kind);
        self.default = Some(default);
        self
    }
}

/// An ordered sequence of descriptors. Order follows contribution
/// order, which in turn follows aspect registration order.
#[derive(Debug, Clone, Default)]
pub struct OptionSchema {
    descriptors: Vec<OptionDescriptor>,
}

impl OptionSchema {
    /// Appends a descriptor, failing fast on a duplicate name.
    pub fn push(&mut self, descriptor: OptionDescriptor) -> SchemaResult<()> {
        if self.get(&descriptor.name).is_some() {
            return Err(SchemaError::DuplicateOption(descriptor.name));
        }
        self.descriptors.push(descriptor);
        Ok(())
    }

    /// Looks a descriptor up by name.
    pub fn get(&self, name: &str) -> Option<&OptionDescriptor> {
        self.descriptors.iter().find(|d| d.name == name)
    }

    pub fn iter(&self) -> impl Iterator<Item = &OptionDescriptor> {
        self.descriptors.iter()
    }

    pub fn len(&self) -> usize {
        self.descriptors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.descriptors.is_empty()
    }
}
