//! The per-company enrichment loop

use crate::{EnricherError, RunMetrics};
use compass_domain::traits::{LookupClient, RecordSink, RecordSource};
use compass_domain::{fold_raw, DateZone, EnrichedRecord, SeedRecord};
use std::fmt;
use std::time::Instant;

/// Where a company is in its pass
///
/// `Seeded -> LookupSent -> (LookupFailed | LookupOk) -> Mapped -> Written`,
/// with `LookupFailed` going straight to `Written`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    /// Taken from the source
    Seeded,
    /// Request sent to the lookup service
    LookupSent,
    /// Lookup failed; the record will be written unenriched
    LookupFailed,
    /// Lookup returned a branch list
    LookupOk,
    /// All branch records folded
    Mapped,
    /// Persisted
    Written,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Stage::Seeded => "SEEDED",
            Stage::LookupSent => "LOOKUP_SENT",
            Stage::LookupFailed => "LOOKUP_FAILED",
            Stage::LookupOk => "LOOKUP_OK",
            Stage::Mapped => "MAPPED",
            Stage::Written => "WRITTEN",
        };
        f.write_str(name)
    }
}

fn enter(stage: Stage, index: usize, seed: &SeedRecord) {
    tracing::debug!(index, inn = %seed.inn, stage = %stage, "Company stage");
}

/// Runs enrichment passes
///
/// Companies are processed strictly one after another: looked up, mapped and
/// written before the next one starts.
///
/// # Examples
///
/// ```no_run
/// use compass_enricher::{Enricher, JsonFileSink};
/// use compass_lookup::HttpLookup;
/// use compass_source::{SeedQuery, Selection, SqliteSource};
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let source = SqliteSource::open("reference.db", SeedQuery::new("reference_compass", Selection::All))?;
/// let lookup = HttpLookup::new("enrichment.internal", 8003)?;
/// let mut sink = JsonFileSink::new("/data/reference/reference_compass/update", "update");
///
/// let metrics = Enricher::default().run(&source, &lookup, &mut sink).await?;
/// println!("{}", metrics.summary());
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Default)]
pub struct Enricher {
    zone: DateZone,
    metrics: RunMetrics,
}

impl Enricher {
    /// Create an enricher formatting dates in `zone`
    pub fn new(zone: DateZone) -> Self {
        Self {
            zone,
            metrics: RunMetrics::new(),
        }
    }

    /// Get a reference to the current metrics
    pub fn metrics(&self) -> &RunMetrics {
        &self.metrics
    }

    /// Reset metrics counters
    pub fn reset_metrics(&mut self) {
        self.metrics.reset();
    }

    /// Process every seed the source returns
    ///
    /// Source and sink failures end the run. Lookup failures cost one
    /// company its enrichment; mapping failures cost one branch record.
    ///
    /// Returns the metrics collected during the run.
    pub async fn run<R, L, S>(&mut self, source: &R, lookup: &L, sink: &mut S) -> Result<RunMetrics, EnricherError>
    where
        R: RecordSource,
        R::Error: fmt::Display,
        L: LookupClient,
        L::Error: fmt::Display,
        S: RecordSink,
        S::Error: fmt::Display,
    {
        let start = Instant::now();

        let seeds = source.fetch_seeds().await.map_err(|e| {
            tracing::error!(error = %e, "Failed to fetch seeds");
            EnricherError::Source(e.to_string())
        })?;
        tracing::info!(companies = seeds.len(), "Fetched seeds");

        for (index, seed) in seeds.into_iter().enumerate() {
            self.metrics.record_company();
            enter(Stage::Seeded, index, &seed);

            let record = self.enrich(index, seed, lookup).await;

            sink.write(index, &record).map_err(|e| {
                tracing::error!(index, inn = %record.seed.inn, error = %e, "Failed to write record");
                EnricherError::Sink {
                    index,
                    message: e.to_string(),
                }
            })?;
            self.metrics.record_write();
            enter(Stage::Written, index, &record.seed);
        }

        self.metrics.runtime_ms += start.elapsed().as_millis();
        tracing::info!(
            companies = self.metrics.companies,
            lookup_failures = self.metrics.lookup_failures,
            skipped = self.metrics.branches_skipped,
            written = self.metrics.written,
            "Enrichment run finished"
        );

        Ok(self.metrics.clone())
    }

    /// Look one company up and fold its branch records
    ///
    /// Always yields a finalized record, enriched or not.
    async fn enrich<L>(&mut self, index: usize, seed: SeedRecord, lookup: &L) -> EnrichedRecord
    where
        L: LookupClient,
        L::Error: fmt::Display,
    {
        enter(Stage::LookupSent, index, &seed);
        let response = lookup.lookup(&seed).await;
        let mut acc = EnrichedRecord::from_seed(seed);

        match response {
            Err(e) => {
                self.metrics.record_lookup(false);
                tracing::error!(index, inn = %acc.seed.inn, error = %e, "Lookup failed");
                enter(Stage::LookupFailed, index, &acc.seed);
            }
            Ok(response) => {
                self.metrics.record_lookup(true);
                enter(Stage::LookupOk, index, &acc.seed);

                for (position, raw) in response.branches.iter().enumerate() {
                    match fold_raw(&acc, raw, response.from_cache, self.zone) {
                        Ok(next) => {
                            acc = next;
                            self.metrics.record_mapped();
                        }
                        Err(e) => {
                            self.metrics.record_skipped();
                            tracing::error!(
                                row = index + 1,
                                branch = position,
                                inn = %acc.seed.inn,
                                error = %e,
                                data = ?acc,
                                "Failed to map branch record"
                            );
                        }
                    }
                }
                enter(Stage::Mapped, index, &acc.seed);
            }
        }

        acc.finalize()
    }
}
