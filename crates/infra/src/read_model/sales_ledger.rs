use std::collections::{BTreeMap, BTreeSet};
use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use jawara_core::{DomainError, DomainResult};
use jawara_sales::{ProductCatalog, SalesRecord, SalesSeriesProvider, SeriesPoint};

#[derive(Debug, Default)]
struct Ledger {
    catalog: BTreeSet<String>,
    series: BTreeMap<String, Vec<SeriesPoint>>,
}

/// In-memory sales ledger for tests/dev.
///
/// Serves as both the product catalog and the series provider. Every product
/// with recorded sales is implicitly in the catalog; products can also be
/// registered before any sale exists.
#[derive(Debug, Default)]
pub struct InMemorySalesLedger {
    inner: RwLock<Ledger>,
}

impl InMemorySalesLedger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn arc() -> Arc<Self> {
        Arc::new(Self::new())
    }

    fn read(&self) -> RwLockReadGuard<'_, Ledger> {
        self.inner.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, Ledger> {
        self.inner.write().unwrap_or_else(PoisonError::into_inner)
    }

    /// Returns `false` if the product was already known.
    pub fn register_product(&self, product_name: &str) -> DomainResult<bool> {
        let name = product_name.trim();
        if name.is_empty() {
            return Err(DomainError::invalid_parameter("product_name cannot be empty"));
        }
        Ok(self.write().catalog.insert(name.to_string()))
    }

    /// Validate and append a batch. Nothing is written if any record is invalid.
    pub fn record_all<I>(&self, records: I) -> DomainResult<usize>
    where
        I: IntoIterator<Item = SalesRecord>,
    {
        let records = records
            .into_iter()
            .map(SalesRecord::validated)
            .collect::<DomainResult<Vec<_>>>()?;

        let mut ledger = self.write();
        for record in &records {
            ledger.catalog.insert(record.product_name.clone());
            let series = ledger.series.entry(record.product_name.clone()).or_default();
            // After any existing points on the same date, so duplicates keep arrival order.
            let at = series.partition_point(|p| p.date <= record.date);
            series.insert(at, record.point());
        }
        Ok(records.len())
    }

    pub fn record(&self, record: SalesRecord) -> DomainResult<()> {
        self.record_all([record]).map(|_| ())
    }

    pub fn record_count(&self) -> usize {
        self.read().series.values().map(Vec::len).sum()
    }
}

impl SalesSeriesProvider for InMemorySalesLedger {
    fn series(&self, product_name: &str) -> Vec<SeriesPoint> {
        self.read().series.get(product_name).cloned().unwrap_or_default()
    }
}

impl ProductCatalog for InMemorySalesLedger {
    fn products(&self) -> Vec<String> {
        self.read().catalog.iter().cloned().collect()
    }

    fn contains(&self, product_name: &str) -> bool {
        self.read().catalog.contains(product_name)
    }
}
