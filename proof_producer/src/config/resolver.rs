//! Parses process arguments and the optional ini config file against
//! the accumulated schemas and merges the results by precedence.

use std::collections::BTreeMap;
use std::ffi::OsString;
use std::fs;
use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::debug;

use super::aspect::{build_schemas, Aspect};
use super::options::{OptionKind, OptionSchema, OptionValue, SchemaResult};

/// An error raised while parsing configuration input. Reported to the
/// caller, which decides exit behavior; parsing never terminates the
/// process on its own.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Command-line rejection: unknown flag, missing value, or type
    /// mismatch. Carries the full rendered diagnostic.
    #[error("{0}")]
    Cli(String),

    /// Structural problem in the config file: unknown key, malformed
    /// line, or a value that does not match the declared kind.
    #[error("config file {}: {reason}", path.display())]
    File { path: PathBuf, reason: String },

    /// The config file exists but could not be read.
    #[error("cannot read config file {}: {source}", path.display())]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
}

/// Option values resolved from a single source (argv or the config
/// file). Presence of a key is distinguishable from absence.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ResolvedValues {
    values: BTreeMap<String, OptionValue>,
}

impl ResolvedValues {
    pub fn insert(&mut self, name: &str, value: OptionValue) {
        self.values.insert(name.to_string(), value);
    }

    pub fn get(&self, name: &str) -> Option<&OptionValue> {
        self.values.get(name)
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

/// The single resolved configuration map: exactly one value per option
/// name, or absence when neither source set it and no default exists.
/// Read-only once built.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MergedValues {
    values: BTreeMap<String, OptionValue>,
}

impl MergedValues {
    /// True iff the option carries any value (including a flag's bare
    /// presence).
    pub fn is_set(&self, name: &str) -> bool {
        self.values.contains_key(name)
    }

    pub fn get(&self, name: &str) -> Option<&OptionValue> {
        self.values.get(name)
    }

    pub fn get_str(&self, name: &str) -> Option<&str> {
        self.values.get(name).and_then(OptionValue::as_str)
    }

    pub fn get_int(&self, name: &str) -> Option<i64> {
        self.values.get(name).and_then(OptionValue::as_int)
    }
}

/// Owns the two schemas and performs parse + merge against them.
pub struct Configurator {
    cli_schema: OptionSchema,
    cfg_schema: OptionSchema,
}

impl Configurator {
    pub fn new(cli_schema: OptionSchema, cfg_schema: OptionSchema) -> Self {
        Self {
            cli_schema,
            cfg_schema,
        }
    }

    /// Builds both schemas from the registered aspects, in order.
    pub fn from_aspects(aspects: &[&dyn Aspect]) -> SchemaResult<Self> {
        let (cli_schema, cfg_schema) = build_schemas(aspects)?;
        Ok(Self::new(cli_schema, cfg_schema))
    }

    pub fn cli_schema(&self) -> &OptionSchema {
        &self.cli_schema
    }

    pub fn cfg_schema(&self) -> &OptionSchema {
        &self.cfg_schema
    }

    /// Parses command-line tokens (without the binary name) against
    /// the CLI schema. Tokenization, short flags, unknown-flag
    /// rejection and typed value parsing are delegated to a
    /// dynamically assembled `clap` command.
    pub fn parse_cli<I, T>(&self, args: I) -> Result<ResolvedValues, ConfigError>
    where
        I: IntoIterator<Item = T>,
        T: Into<OsString> + Clone,
    {
        let matches = self
            .cli_command()
            .try_get_matches_from(args)
            .map_err(|e| ConfigError::Cli(e.to_string()))?;

        let mut values = ResolvedValues::default();
        for descriptor in self.cli_schema.iter() {
            let name = descriptor.name.as_str();
            match descriptor.kind {
                OptionKind::Flag => {
                    if matches.get_flag(name) {
                        values.insert(name, OptionValue::Flag);
                    }
                }
                OptionKind::Str => {
                    if let Some(s) = matches.get_one::<String>(name) {
                        values.insert(name, OptionValue::Str(s.clone()));
                    }
                }
                OptionKind::Int => {
                    if let Some(i) = matches.get_one::<i64>(name) {
                        values.insert(name, OptionValue::Int(*i));
                    }
                }
            }
        }
        Ok(values)
    }

    /// Reads an ini-style file of `key=value` pairs against the
    /// config-file schema. `[section]` headers are accepted and
    /// transparent to key identity; `#`/`;` lines are comments. A
    /// missing file yields no values because file config is optional.
    pub fn parse_file(&self, path: &Path) -> Result<ResolvedValues, ConfigError> {
        if !path.exists() {
            debug!("no config file at {}, skipping", path.display());
            return Ok(ResolvedValues::default());
        }
        let text = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;

        let file_error = |reason: String| ConfigError::File {
            path: path.to_path_buf(),
            reason,
        };

        let mut values = ResolvedValues::default();
        for (idx, raw) in text.lines().enumerate() {
            let line = raw.trim();
            if line.is_empty() || line.starts_with('#') || line.starts_with(';') {
                continue;
            }
            if line.starts_with('[') && line.ends_with(']') {
                continue;
            }
            let Some((key, value)) = line.split_once('=') else {
                return Err(file_error(format!(
                    "expected `key=value` on line {}",
                    idx + 1
                )));
            };
            let (key, value) = (key.trim(), value.trim());
            let Some(descriptor) = self.cfg_schema.get(key) else {
                return Err(file_error(format!(
                    "unknown option `{}` on line {}",
                    key,
                    idx + 1
                )));
            };
            match descriptor.kind {
                OptionKind::Str => values.insert(key, OptionValue::Str(value.to_string())),
                OptionKind::Int => {
                    let parsed = value.parse::<i64>().map_err(|_| {
                        file_error(format!(
                            "option `{}` expects an integer, got `{}` (line {})",
                            key,
                            value,
                            idx + 1
                        ))
                    })?;
                    values.insert(key, OptionValue::Int(parsed));
                }
                OptionKind::Flag => match value.to_ascii_lowercase().as_str() {
                    // A flag set to false is the same as not setting it.
                    "true" | "1" => values.insert(key, OptionValue::Flag),
                    "false" | "0" => {}
                    other => {
                        return Err(file_error(format!(
                            "option `{}` is a flag and expects true/false, got `{}` (line {})",
                            key,
                            other,
                            idx + 1
                        )))
                    }
                },
            }
        }
        Ok(values)
    }

    /// Combines both sources: for every option name across both
    /// schemas, the value is the CLI value if present, else the file
    /// value if present, else the descriptor's default if any, else
    /// absent. No other precedence order is valid.
    pub fn merge(&self, cli: &ResolvedValues, file: &ResolvedValues) -> MergedValues {
        let mut merged = MergedValues::default();
        for descriptor in self.cli_schema.iter().chain(self.cfg_schema.iter()) {
            let name = descriptor.name.as_str();
            if merged.is_set(name) {
                continue;
            }
            let value = cli
                .get(name)
                .or_else(|| file.get(name))
                .cloned()
                .or_else(|| descriptor.default.clone());
            if let Some(value) = value {
                merged.values.insert(name.to_string(), value);
            }
        }
        merged
    }

    fn cli_command(&self) -> clap::Command {
        let mut cmd = clap::Command::new("proof_producer")
            .no_binary_name(true)
            .disable_help_flag(true);
        for descriptor in self.cli_schema.iter() {
            let mut arg = clap::Arg::new(descriptor.name.clone())
                .long(descriptor.name.clone())
                .help(descriptor.help.clone());
            if let Some(short) = descriptor.short {
                arg = arg.short(short);
            }
            arg = match descriptor.kind {
                OptionKind::Flag => arg.action(clap::ArgAction::SetTrue),
                OptionKind::Str => arg
                    .action(clap::ArgAction::Set)
                    .value_parser(clap::value_parser!(String)),
                OptionKind::Int => arg
                    .action(clap::ArgAction::Set)
                    .value_parser(clap::value_parser!(i64)),
            };
            cmd = cmd.arg(arg);
        }
        cmd
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::options::OptionDescriptor;
    use crate::testing_utils::write_temp_file;

    fn test_configurator() -> Configurator {
        let mut cli = OptionSchema::default();
        cli.push(
            OptionDescriptor::string("log-level", "Log level")
                .with_short('l')
                .with_default(OptionValue::Str("info".to_string())),
        )
        .unwrap();
        cli.push(OptionDescriptor::string("circuit", "Circuit input file").with_short('c'))
            .unwrap();
        cli.push(OptionDescriptor::flag("skip-verification", "Skip verification"))
            .unwrap();
        cli.push(OptionDescriptor::int("shard0-mem-scale", "Shard 0 memory scale"))
            .unwrap();

        let mut cfg = OptionSchema::default();
        cfg.push(OptionDescriptor::string("log-level", "Log level"))
            .unwrap();
        cfg.push(OptionDescriptor::flag("skip-verification", "Skip verification"))
            .unwrap();
        cfg.push(OptionDescriptor::int("shard0-mem-scale", "Shard 0 memory scale"))
            .unwrap();

        Configurator::new(cli, cfg)
    }

    #[test]
    fn cli_value_takes_precedence_over_file_value() {
        let configurator = test_configurator();
        let cli = configurator
            .parse_cli(["--log-level", "debug"])
            .unwrap();
        let path = write_temp_file("precedence.ini", b"log-level = trace\n");
        let file = configurator.parse_file(&path).unwrap();

        let merged = configurator.merge(&cli, &file);
        assert_eq!(merged.get_str("log-level"), Some("debug"));
    }

    #[test]
    fn file_value_applies_when_cli_is_silent() {
        let configurator = test_configurator();
        let cli = configurator.parse_cli(Vec::<String>::new()).unwrap();
        let path = write_temp_file("file_only.ini", b"log-level = trace\n");
        let file = configurator.parse_file(&path).unwrap();

        let merged = configurator.merge(&cli, &file);
        assert_eq!(merged.get_str("log-level"), Some("trace"));
    }

    #[test]
    fn descriptor_default_applies_when_both_sources_are_silent() {
        let configurator = test_configurator();
        let cli = configurator.parse_cli(Vec::<String>::new()).unwrap();
        let merged = configurator.merge(&cli, &ResolvedValues::default());
        assert_eq!(merged.get_str("log-level"), Some("info"));
    }

    #[test]
    fn option_without_value_or_default_is_absent() {
        let configurator = test_configurator();
        let cli = configurator.parse_cli(Vec::<String>::new()).unwrap();
        let merged = configurator.merge(&cli, &ResolvedValues::default());
        assert!(!merged.is_set("circuit"));
        assert_eq!(merged.get_str("circuit"), None);
    }

    #[test]
    fn unknown_cli_flag_is_a_descriptive_error() {
        let configurator = test_configurator();
        let err = configurator
            .parse_cli(["--no-such-option", "1"])
            .unwrap_err();
        assert!(matches!(err, ConfigError::Cli(_)));
        assert!(err.to_string().contains("--no-such-option"));
    }

    #[test]
    fn cli_type_mismatch_is_an_error() {
        let configurator = test_configurator();
        let err = configurator
            .parse_cli(["--shard0-mem-scale", "lots"])
            .unwrap_err();
        assert!(matches!(err, ConfigError::Cli(_)));
    }

    #[test]
    fn flag_presence_is_distinguishable_from_absence() {
        let configurator = test_configurator();

        let set = configurator.parse_cli(["--skip-verification"]).unwrap();
        assert_eq!(set.get("skip-verification"), Some(&OptionValue::Flag));

        let unset = configurator.parse_cli(Vec::<String>::new()).unwrap();
        assert_eq!(unset.get("skip-verification"), None);
        // Absence must survive the merge too: no default exists.
        let merged = configurator.merge(&unset, &ResolvedValues::default());
        assert!(!merged.is_set("skip-verification"));
    }

    #[test]
    fn declared_short_forms_are_accepted() {
        let configurator = test_configurator();
        let values = configurator.parse_cli(["-l", "error", "-c", "a.crct"]).unwrap();
        assert_eq!(values.get("log-level").unwrap().as_str(), Some("error"));
        assert_eq!(values.get("circuit").unwrap().as_str(), Some("a.crct"));
    }

    #[test]
    fn ini_sections_and_comments_are_transparent() {
        let configurator = test_configurator();
        let path = write_temp_file(
            "full.ini",
            b"# generated\n[prover]\nlog-level = warning\n; legacy\nskip-verification = true\nshard0-mem-scale = 4\n",
        );
        let values = configurator.parse_file(&path).unwrap();
        assert_eq!(values.get("log-level").unwrap().as_str(), Some("warning"));
        assert_eq!(values.get("skip-verification"), Some(&OptionValue::Flag));
        assert_eq!(values.get("shard0-mem-scale").unwrap().as_int(), Some(4));
    }

    #[test]
    fn false_flag_in_file_reads_as_absent() {
        let configurator = test_configurator();
        let path = write_temp_file("false_flag.ini", b"skip-verification = false\n");
        let values = configurator.parse_file(&path).unwrap();
        assert_eq!(values.get("skip-verification"), None);
    }

    #[test]
    fn unknown_ini_key_is_an_error() {
        let configurator = test_configurator();
        let path = write_temp_file("unknown_key.ini", b"no-such-option = 1\n");
        let err = configurator.parse_file(&path).unwrap_err();
        assert!(matches!(err, ConfigError::File { .. }));
        assert!(err.to_string().contains("no-such-option"));
    }

    #[test]
    fn missing_config_file_yields_no_values() {
        let configurator = test_configurator();
        let values = configurator
            .parse_file(Path::new("/definitely/not/here/config.ini"))
            .unwrap();
        assert!(values.is_empty());
    }

    #[test]
    fn malformed_ini_line_is_an_error() {
        let configurator = test_configurator();
        let path = write_temp_file("malformed.ini", b"log-level without equals\n");
        let err = configurator.parse_file(&path).unwrap_err();
        assert!(err.to_string().contains("key=value"));
    }
}
