//! Metrics collection for enrichment runs

/// Counters collected during one run
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RunMetrics {
    /// Seeds taken from the source
    pub companies: usize,

    /// Lookups that returned a usable response
    pub lookups_ok: usize,

    /// Lookups that failed; those companies were written unenriched
    pub lookup_failures: usize,

    /// Branch records folded into a record
    pub branches_mapped: usize,

    /// Branch records skipped after a mapping error
    pub branches_skipped: usize,

    /// Records handed to the sink successfully
    pub written: usize,

    /// Wall-clock runtime in milliseconds
    pub runtime_ms: u128,
}

impl RunMetrics {
    /// Create new empty metrics
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a company taken from the source
    pub fn record_company(&mut self) {
        self.companies += 1;
    }

    /// Record the outcome of one lookup
    pub fn record_lookup(&mut self, ok: bool) {
        if ok {
            self.lookups_ok += 1;
        } else {
            self.lookup_failures += 1;
        }
    }

    /// Record one branch record mapped
    pub fn record_mapped(&mut self) {
        self.branches_mapped += 1;
    }

    /// Record one branch record skipped
    pub fn record_skipped(&mut self) {
        self.branches_skipped += 1;
    }

    /// Record one file written
    pub fn record_write(&mut self) {
        self.written += 1;
    }

    /// Reset all metrics
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    /// Generate a summary report of metrics
    pub fn summary(&self) -> String {
        let lines = [
            "Enrichment Run Summary".to_string(),
            "======================".to_string(),
            format!("Companies: {}", self.companies),
            format!("Lookups: {} ok, {} failed", self.lookups_ok, self.lookup_failures),
            format!("Branch records: {} mapped, {} skipped", self.branches_mapped, self.branches_skipped),
            format!("Written: {}", self.written),
            format!("Runtime: {}ms", self.runtime_ms),
        ];
        lines.join("\n")
    }
}
