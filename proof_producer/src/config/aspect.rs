//! The aspect contract: self-contained configuration units that
//! contribute option descriptors and later consume the merged values.
//!
//! The two capabilities are split into separate traits because schema
//! contribution only needs shared access while initialization mutates
//! the aspect; units whose state is fixed at construction (the path
//! aspect) implement only [`Aspect`].

use tracing::debug;

use super::options::{OptionSchema, SchemaResult};
use super::resolver::MergedValues;

/// A configuration unit contributing option descriptors to the CLI
/// and config-file schemas.
pub trait Aspect {
    /// Contributes this aspect's CLI options. Called exactly once per
    /// schema build, in registration order.
    fn cli_options(&self, cli: &mut OptionSchema) -> SchemaResult<()>;

    /// Contributes this aspect's config-file options. Most aspects of
    /// this tool contribute nothing here, but the mechanism is
    /// generic.
    fn cfg_options(&self, cfg: &mut OptionSchema) -> SchemaResult<()>;
}

/// A configuration unit that populates its typed fields from the
/// merged value map. State is immutable once `initialize` returns.
pub trait InitializeAspect {
    /// Consumes the merged configuration. Field-level validation
    /// failures are soft by design: they are logged and leave the
    /// field unset or at its prior value, so a single run can report
    /// every configuration problem.
    fn initialize(&mut self, merged: &MergedValues);
}

/// Builds the CLI and config-file schemas by invoking every registered
/// aspect's contribution methods once, in registration order. A
/// duplicate option name contributed across aspects fails the build.
pub fn build_schemas(aspects: &[&dyn Aspect]) -> SchemaResult<(OptionSchema, OptionSchema)> {
    let mut cli = OptionSchema::default();
    let mut cfg = OptionSchema::default();
    for aspect in aspects {
        aspect.cli_options(&mut cli)?;
        aspect.cfg_options(&mut cfg)?;
    }
    debug!(
        cli_options = cli.len(),
        cfg_options = cfg.len(),
        "configuration schemas built"
    );
    Ok((cli, cfg))
}

/// Calls each aspect's `initialize` exactly once, in registration
/// order. Later aspects may rely on earlier ones having already
/// derived their values.
pub fn initialize_aspects(aspects: &mut [&mut dyn InitializeAspect], merged: &MergedValues) {
    for aspect in aspects.iter_mut() {
        aspect.initialize(merged);
    }
}
