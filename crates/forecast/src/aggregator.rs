use std::collections::{BTreeMap, BTreeSet};

use chrono::{DateTime, Utc};
use rayon::prelude::*;

use jawara_auth::Principal;
use jawara_core::{Alpha, DomainError, DomainResult};
use jawara_sales::{ProductCatalog, SalesSeriesProvider};

use crate::accuracy::mean;
use crate::engine::forecast_product;
use crate::result::{CreatedBy, ExclusionWarning, ForecastRun, ProductForecastResult};

/// Fans a forecast request out across products and folds the results into a run.
///
/// Products are computed in parallel on the rayon pool; the run is only
/// assembled after every product has finished, so a partially computed run is
/// never observable.
#[derive(Debug, Clone)]
pub struct MultiProductAggregator<P, C> {
    provider: P,
    catalog: C,
}

impl<P, C> MultiProductAggregator<P, C>
where
    P: SalesSeriesProvider,
    C: ProductCatalog,
{
    pub fn new(provider: P, catalog: C) -> Self {
        Self { provider, catalog }
    }

    pub fn catalog(&self) -> &C {
        &self.catalog
    }

    /// Forecast one product (`product = Some`) or the whole catalog.
    ///
    /// Products without usable data are dropped with a warning; the call only
    /// fails `InsufficientData` when nothing is left.
    pub fn aggregate(
        &self,
        alpha: f64,
        product: Option<&str>,
        principal: &Principal,
    ) -> DomainResult<ForecastRun> {
        self.aggregate_at(alpha, product, principal, Utc::now())
    }

    /// [`Self::aggregate`] with an explicit creation instant.
    pub fn aggregate_at(
        &self,
        alpha: f64,
        product: Option<&str>,
        principal: &Principal,
        created_at: DateTime<Utc>,
    ) -> DomainResult<ForecastRun> {
        let alpha = Alpha::new(alpha)?;
        let targets = self.resolve_targets(product)?;

        let outcomes: Vec<(String, DomainResult<ProductForecastResult>)> = targets
            .into_par_iter()
            .map(|name| {
                let series = self.provider.series(&name);
                let outcome = forecast_product(&name, &series, alpha);
                (name, outcome)
            })
            .collect();

        let mut results: BTreeMap<String, ProductForecastResult> = BTreeMap::new();
        let mut warnings: Vec<ExclusionWarning> = Vec::new();

        for (name, outcome) in outcomes {
            match outcome {
                Ok(result) => {
                    tracing::debug!(
                        product = %name,
                        periods = result.steps.len(),
                        mape = result.mape,
                        "product forecast computed"
                    );
                    results.insert(name, result);
                }
                Err(DomainError::InsufficientData(reason)) => {
                    tracing::warn!(product = %name, %reason, "product excluded from forecast run");
                    warnings.push(ExclusionWarning {
                        product_name: name,
                        reason,
                    });
                }
                Err(other) => return Err(other),
            }
        }

        let Some(overall_mape) = mean(results.values().map(|r| r.mape)) else {
            let detail = warnings
                .iter()
                .map(|w| w.reason.as_str())
                .collect::<Vec<_>>()
                .join("; ");
            return Err(DomainError::insufficient_data(if detail.is_empty() {
                "no products to forecast".to_string()
            } else {
                format!("no product has usable sales data ({detail})")
            }));
        };

        Ok(ForecastRun {
            name: None,
            created_at,
            created_by: CreatedBy::from(principal),
            alpha,
            results,
            overall_mape,
            warnings,
        })
    }

    /// The single requested product (validated against the catalog) or every
    /// catalog product, deduplicated and in lexicographic order.
    fn resolve_targets(&self, product: Option<&str>) -> DomainResult<Vec<String>> {
        match product.map(str::trim).filter(|p| !p.is_empty()) {
            Some(name) => {
                if !self.catalog.contains(name) {
                    return Err(DomainError::not_found(format!("product '{name}' not found")));
                }
                Ok(vec![name.to_string()])
            }
            None => Ok(self
                .catalog
                .products()
                .into_iter()
                .collect::<BTreeSet<_>>()
                .into_iter()
                .collect()),
        }
    }
}
