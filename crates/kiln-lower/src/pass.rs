//! Per-file lowering entry point

use crate::bindings::RuntimeBindings;
use crate::config::BindingNames;
use crate::constructor::ConstructorRewriter;
use crate::error::ConfigResult;
use crate::property::PropertyAccessRewriter;
use crate::stats::LoweringStats;
use crate::verify::{find_violations, Violation};
use kiln_ir::transform::transform_declarations;
use kiln_ir::{BuiltinTypes, IrFile, PrettyPrint, SymbolTable};
use tracing::{debug, info_span, trace};

/// A backend pass run once per compilation unit
pub trait FileLoweringPass {
    /// Pass name, used in logs
    fn name(&self) -> &'static str;

    /// Lower one file in place
    fn lower(&self, file: &mut IrFile) -> LoweringStats;

    /// Lower several files, summing the counts
    fn lower_files(&self, files: &mut [IrFile]) -> LoweringStats {
        let mut total = LoweringStats::default();
        for file in files {
            total.merge(&self.lower(file));
        }
        total
    }
}

/// Lowers throwable constructions and `message` / `cause` reads into
/// allocation plus dynamic field access.
///
/// Holds only shared state, so one instance may lower different files from
/// several threads at once.
#[derive(Debug)]
pub struct ThrowableLowering<'a> {
    symbols: &'a SymbolTable,
    bindings: RuntimeBindings,
}

impl<'a> ThrowableLowering<'a> {
    /// Resolve the runtime bindings named by `names`
    pub fn new(symbols: &'a SymbolTable, types: BuiltinTypes, names: &BindingNames) -> ConfigResult<Self> {
        let bindings = RuntimeBindings::resolve(symbols, types, names)?;
        Ok(Self { symbols, bindings })
    }

    /// Resolve the default (JS runtime) bindings
    pub fn with_defaults(symbols: &'a SymbolTable) -> ConfigResult<Self> {
        Self::new(symbols, BuiltinTypes::default(), &BindingNames::default())
    }

    /// Resolved bindings
    pub fn bindings(&self) -> &RuntimeBindings {
        &self.bindings
    }

    /// Nodes in `file` that a complete lowering would have rewritten
    pub fn verify(&self, file: &IrFile) -> Vec<Violation> {
        find_violations(self.symbols, &self.bindings, file)
    }
}

impl FileLoweringPass for ThrowableLowering<'_> {
    fn name(&self) -> &'static str {
        "throwable-successors"
    }

    fn lower(&self, file: &mut IrFile) -> LoweringStats {
        let _span = info_span!("lower_file", pass = self.name(), file = %file.name).entered();
        if tracing::enabled!(tracing::Level::TRACE) {
            trace!(ir = %file.pretty_print(self.symbols), "before");
        }

        let IrFile {
            declarations,
            variables,
            ..
        } = file;

        let mut constructors = ConstructorRewriter::new(self.symbols, &self.bindings, variables);
        transform_declarations(&mut constructors, declarations);
        let mut stats = constructors.into_stats();

        let mut properties = PropertyAccessRewriter::new(self.symbols, &self.bindings);
        transform_declarations(&mut properties, declarations);
        stats.merge(properties.stats());

        debug!(%stats, "lowered");
        if tracing::enabled!(tracing::Level::TRACE) {
            trace!(ir = %file.pretty_print(self.symbols), "after");
        }
        stats
    }
}
