//! Lowering statistics

use std::fmt;

/// Counts of rewrites performed by one or more `lower` calls
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LoweringStats {
    /// Direct constructions replaced by allocation + initialization
    pub constructor_calls: usize,
    /// Delegating constructor calls retargeted to the default constructor
    pub delegating_calls: usize,
    /// Getter calls replaced by a dynamic field read
    pub property_reads: usize,
    /// Constructions with an argument count outside the known shapes
    pub fallback_shapes: usize,
}

impl LoweringStats {
    /// Add the counts of `other`
    pub fn merge(&mut self, other: &LoweringStats) {
        self.constructor_calls += other.constructor_calls;
        self.delegating_calls += other.delegating_calls;
        self.property_reads += other.property_reads;
        self.fallback_shapes += other.fallback_shapes;
    }

    /// Total number of rewritten nodes
    pub fn total_rewrites(&self) -> usize {
        self.constructor_calls + self.delegating_calls + self.property_reads
    }

    /// Check if nothing was rewritten
    pub fn is_empty(&self) -> bool {
        self.total_rewrites() == 0
    }
}

impl fmt::Display for LoweringStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} constructions, {} delegations, {} property reads ({} fallback shapes)",
            self.constructor_calls, self.delegating_calls, self.property_reads, self.fallback_shapes
        )
    }
}
