//! Override-graph search
//!
//! Decides whether a call target is really the base getter. A synthetic
//! override only forwards to what it overrides, so walking up through
//! synthetic overrides is transparent; a source override has logic of its own
//! and ends the walk.

use kiln_ir::{FunctionId, SymbolTable};
use rustc_hash::FxHashSet;
use std::hash::Hash;

/// Existential depth-first search.
///
/// Starting from `start`, reports whether some reachable node satisfies
/// `matches`. Edges out of a node are followed only when `may_leave(node)`
/// holds. Each node is examined at most once, so cycles terminate.
pub fn any_reachable<N, E, I, L, M>(start: &[N], mut edges: E, mut may_leave: L, mut matches: M) -> bool
where
    N: Copy + Eq + Hash,
    E: FnMut(N) -> I,
    I: IntoIterator<Item = N>,
    L: FnMut(N) -> bool,
    M: FnMut(N) -> bool,
{
    let mut visited = FxHashSet::default();
    let mut stack: Vec<N> = start.iter().rev().copied().collect();

    while let Some(node) = stack.pop() {
        if !visited.insert(node) {
            continue;
        }
        if matches(node) {
            return true;
        }
        if may_leave(node) {
            let mut next: Vec<N> = edges(node).into_iter().collect();
            next.reverse();
            stack.extend(next);
        }
    }
    false
}

/// Check if a call to `function` reads `base`: either it is `base`, or it is
/// a synthetic override that reaches `base` through synthetic overrides only.
pub fn is_same_or_synthetic_override(symbols: &SymbolTable, function: FunctionId, base: FunctionId) -> bool {
    if function == base {
        return true;
    }
    if !symbols.function(function).origin.is_synthetic_override() {
        return false;
    }

    any_reachable(
        symbols.overridden(function),
        |f| symbols.overridden(f).iter().copied(),
        |f| symbols.function(f).origin.is_synthetic_override(),
        |f| f == base,
    )
}
