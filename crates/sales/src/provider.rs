use std::sync::Arc;

use crate::record::SeriesPoint;

/// Source of per-product daily sales series.
///
/// Implementations return points ascending by date. An unknown product or a
/// product without sales yields an empty series; the engine decides what that
/// means.
pub trait SalesSeriesProvider: Send + Sync {
    fn series(&self, product_name: &str) -> Vec<SeriesPoint>;
}

/// Set of products the forecaster may target.
pub trait ProductCatalog: Send + Sync {
    /// Product names in lexicographic order.
    fn products(&self) -> Vec<String>;

    fn contains(&self, product_name: &str) -> bool {
        self.products().iter().any(|p| p == product_name)
    }
}

impl<P: SalesSeriesProvider + ?Sized> SalesSeriesProvider for Arc<P> {
    fn series(&self, product_name: &str) -> Vec<SeriesPoint> {
        (**self).series(product_name)
    }
}

impl<C: ProductCatalog + ?Sized> ProductCatalog for Arc<C> {
    fn products(&self) -> Vec<String> {
        (**self).products()
    }

    fn contains(&self, product_name: &str) -> bool {
        (**self).contains(product_name)
    }
}
