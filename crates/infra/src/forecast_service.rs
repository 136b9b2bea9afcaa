//! Forecast operations exposed to callers (application-level orchestration).
//!
//! ```text
//! request + principal
//!   ↓
//! 1. RoleGate check (generate / manage / view)
//!   ↓
//! 2. MultiProductAggregator (pure, parallel per product)
//!   ↓
//! 3. ProjectStore (named → create, unnamed → retained for `latest`)
//! ```
//!
//! This module contains no IO itself; it composes the store, provider and gate traits.

use serde::Deserialize;

use jawara_auth::{Principal, RoleGate};
use jawara_core::{DomainError, DomainResult};
use jawara_forecast::{ForecastRun, MultiProductAggregator, ProjectSummary};
use jawara_sales::{ProductCatalog, SalesSeriesProvider};

use crate::projects::ProjectStore;

/// Input of [`ForecastService::generate_forecast`].
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct GenerateForecast {
    pub alpha: f64,
    /// Restrict the run to one product; blank means all products.
    #[serde(default, alias = "product_name")]
    pub product: Option<String>,
    /// Persist the run under this name; blank means a transient run.
    #[serde(default)]
    pub project_name: Option<String>,
}

impl GenerateForecast {
    pub fn all_products(alpha: f64) -> Self {
        Self {
            alpha,
            product: None,
            project_name: None,
        }
    }

    pub fn for_product(mut self, product: impl Into<String>) -> Self {
        self.product = Some(product.into());
        self
    }

    pub fn named(mut self, project_name: impl Into<String>) -> Self {
        self.project_name = Some(project_name.into());
        self
    }
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

#[derive(Debug, Clone)]
pub struct ForecastService<S, P, C, G> {
    store: S,
    aggregator: MultiProductAggregator<P, C>,
    gate: G,
}

impl<S, P, C, G> ForecastService<S, P, C, G>
where
    S: ProjectStore,
    P: SalesSeriesProvider,
    C: ProductCatalog,
    G: RoleGate,
{
    pub fn new(store: S, provider: P, catalog: C, gate: G) -> Self {
        Self {
            store,
            aggregator: MultiProductAggregator::new(provider, catalog),
            gate,
        }
    }

    pub fn gate(&self) -> &G {
        &self.gate
    }

    pub fn catalog(&self) -> &C {
        self.aggregator.catalog()
    }

    fn require(&self, allowed: bool, action: &str) -> DomainResult<()> {
        if allowed {
            Ok(())
        } else {
            Err(DomainError::unauthorized(format!("principal may not {action}")))
        }
    }

    pub fn generate_forecast(
        &self,
        request: &GenerateForecast,
        principal: &Principal,
    ) -> DomainResult<ForecastRun> {
        self.require(self.gate.can_generate(principal), "generate forecasts")?;

        let run = self.aggregator.aggregate(
            request.alpha,
            non_blank(request.product.as_deref()),
            principal,
        )?;

        let run = match non_blank(request.project_name.as_deref()) {
            Some(name) => self.store.create(name, run)?,
            None => {
                self.store.record_transient(run.clone());
                run
            }
        };

        tracing::info!(
            project = run.name.as_deref().unwrap_or("<unnamed>"),
            alpha = run.alpha.value(),
            products = run.product_count(),
            excluded = run.warnings.len(),
            overall_mape = run.overall_mape,
            principal = %principal.principal_id,
            "forecast run generated"
        );
        Ok(run)
    }

    pub fn list_projects(&self, principal: &Principal) -> DomainResult<Vec<ProjectSummary>> {
        self.require(self.gate.can_view(principal), "view projects")?;
        Ok(self.store.list())
    }

    pub fn get_project(&self, name: &str, principal: &Principal) -> DomainResult<ForecastRun> {
        self.require(self.gate.can_view(principal), "view projects")?;
        self.store.get(name)
    }

    pub fn rename_project(
        &self,
        old_name: &str,
        new_name: &str,
        principal: &Principal,
    ) -> DomainResult<()> {
        self.require(self.gate.can_manage(principal), "manage projects")?;
        self.store.rename(old_name, new_name)?;
        tracing::info!(
            from = old_name,
            to = new_name,
            principal = %principal.principal_id,
            "project renamed"
        );
        Ok(())
    }

    pub fn delete_project(&self, name: &str, principal: &Principal) -> DomainResult<()> {
        self.require(self.gate.can_manage(principal), "manage projects")?;
        self.store.delete(name)?;
        tracing::info!(project = name, principal = %principal.principal_id, "project deleted");
        Ok(())
    }

    pub fn get_latest(&self, principal: &Principal) -> DomainResult<ForecastRun> {
        self.require(self.gate.can_view(principal), "view forecasts")?;
        self.store.latest()
    }

    /// Drop every stored project and the retained latest run.
    pub fn reset_projects(&self, principal: &Principal) -> DomainResult<usize> {
        self.require(self.gate.can_manage(principal), "manage projects")?;
        let removed = self.store.clear();
        tracing::info!(removed, principal = %principal.principal_id, "projects reset");
        Ok(removed)
    }

    /// Catalog product names, for pickers.
    pub fn list_products(&self, principal: &Principal) -> DomainResult<Vec<String>> {
        self.require(self.gate.can_view(principal), "view products")?;
        Ok(self.catalog().products())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use chrono::NaiveDate;
    use jawara_auth::{PermissionRoleGate, Role};
    use jawara_core::ErrorKind;
    use jawara_sales::SalesRecord;

    use crate::projects::InMemoryProjectStore;
    use crate::read_model::InMemorySalesLedger;

    type TestService = ForecastService<
        Arc<InMemoryProjectStore>,
        Arc<InMemorySalesLedger>,
        Arc<InMemorySalesLedger>,
        PermissionRoleGate<fn(&Role) -> Vec<jawara_auth::Permission>>,
    >;

    fn seeded_service() -> TestService {
        let ledger = InMemorySalesLedger::arc();
        let start = NaiveDate::from_ymd_opt(2024, 5, 1).unwrap();
        let soto = [21, 20, 18, 20, 22];
        let teh = [30, 28, 35, 31, 29];
        let records = soto
            .iter()
            .enumerate()
            .map(|(i, &q)| SalesRecord::new("Soto Ayam", start + chrono::Days::new(i as u64), q))
            .chain(
                teh.iter()
                    .enumerate()
                    .map(|(i, &q)| {
                        SalesRecord::new("Es Teh", start + chrono::Days::new(i as u64), q)
                    }),
            );
        ledger.record_all(records).unwrap();
        ledger.register_product("Nasi Lele").unwrap();

        ForecastService::new(
            InMemoryProjectStore::arc(),
            ledger.clone(),
            ledger,
            PermissionRoleGate::standard(),
        )
    }

    fn admin() -> Principal {
        Principal::with_role(Role::new("admin"))
    }

    fn owner() -> Principal {
        Principal::with_role(Role::new("owner"))
    }

    #[test]
    fn named_generation_is_persisted() {
        let svc = seeded_service();
        let run = svc
            .generate_forecast(&GenerateForecast::all_products(0.5).named("Q2"), &admin())
            .unwrap();

        assert_eq!(run.name.as_deref(), Some("Q2"));
        assert_eq!(run.product_count(), 2);
        assert_eq!(run.warnings.len(), 1);
        assert_eq!(run.warnings[0].product_name, "Nasi Lele");
        assert_eq!(svc.get_project("Q2", &owner()).unwrap(), run);
        assert_eq!(svc.get_latest(&owner()).unwrap(), run);
    }

    #[test]
    fn unnamed_generation_is_latest_but_not_listed() {
        let svc = seeded_service();
        svc.generate_forecast(&GenerateForecast::all_products(0.5).named("kept"), &admin())
            .unwrap();
        let transient = svc
            .generate_forecast(&GenerateForecast::all_products(0.2).named("   "), &admin())
            .unwrap();

        assert_eq!(transient.name, None);
        assert_eq!(svc.get_latest(&owner()).unwrap(), transient);
        let listed = svc.list_projects(&owner()).unwrap();
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0].name, "kept");
        assert_eq!(listed[0].product_count, 2);
    }

    #[test]
    fn duplicate_project_name_is_rejected() {
        let svc = seeded_service();
        let req = GenerateForecast::all_products(0.5).named("Q2");
        svc.generate_forecast(&req, &admin()).unwrap();
        let err = svc.generate_forecast(&req, &admin()).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::DuplicateName);
    }

    #[test]
    fn owner_cannot_generate_or_manage() {
        let svc = seeded_service();
        let req = GenerateForecast::all_products(0.5).named("Q2");
        assert_eq!(
            svc.generate_forecast(&req, &owner()).unwrap_err().kind(),
            ErrorKind::Unauthorized
        );

        svc.generate_forecast(&req, &admin()).unwrap();
        assert_eq!(
            svc.rename_project("Q2", "Q3", &owner()).unwrap_err().kind(),
            ErrorKind::Unauthorized
        );
        assert_eq!(
            svc.delete_project("Q2", &owner()).unwrap_err().kind(),
            ErrorKind::Unauthorized
        );
        assert_eq!(svc.reset_projects(&owner()).unwrap_err().kind(), ErrorKind::Unauthorized);
        assert!(svc.get_project("Q2", &owner()).is_ok());
    }

    #[test]
    fn unauthorized_generation_leaves_store_untouched() {
        let svc = seeded_service();
        let _ = svc.generate_forecast(&GenerateForecast::all_products(0.5), &owner());
        assert_eq!(svc.get_latest(&admin()).unwrap_err().kind(), ErrorKind::NotFound);
    }

    #[test]
    fn principal_without_roles_cannot_view() {
        let svc = seeded_service();
        let nobody = Principal::new(jawara_auth::PrincipalId::new(), vec![]);
        assert_eq!(svc.list_projects(&nobody).unwrap_err().kind(), ErrorKind::Unauthorized);
    }

    #[test]
    fn rename_delete_and_reset() {
        let svc = seeded_service();
        let a = admin();
        let created = svc
            .generate_forecast(&GenerateForecast::all_products(0.5).named("draft"), &a)
            .unwrap();

        svc.rename_project("draft", "final", &a).unwrap();
        assert_eq!(svc.get_project("final", &a).unwrap(), created.named("final"));
        assert_eq!(svc.get_project("draft", &a).unwrap_err().kind(), ErrorKind::NotFound);

        svc.delete_project("final", &a).unwrap();
        assert_eq!(svc.delete_project("final", &a).unwrap_err().kind(), ErrorKind::NotFound);

        svc.generate_forecast(&GenerateForecast::all_products(0.5).named("x"), &a)
            .unwrap();
        assert_eq!(svc.reset_projects(&a).unwrap(), 1);
        assert!(svc.list_projects(&a).unwrap().is_empty());
    }

    #[test]
    fn single_product_and_errors_pass_through() {
        let svc = seeded_service();
        let a = admin();

        let run = svc
            .generate_forecast(&GenerateForecast::all_products(0.5).for_product("Soto Ayam"), &a)
            .unwrap();
        assert!((run.results["Soto Ayam"].next_period_forecast - 20.8125).abs() < 1e-12);

        let err = svc
            .generate_forecast(&GenerateForecast::all_products(0.5).for_product("Rendang"), &a)
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NotFound);

        let err = svc
            .generate_forecast(&GenerateForecast::all_products(0.0), &a)
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidParameter);

        let err = svc
            .generate_forecast(&GenerateForecast::all_products(0.5).for_product("Nasi Lele"), &a)
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InsufficientData);
    }

    #[test]
    fn failed_generation_does_not_persist_name() {
        let svc = seeded_service();
        let a = admin();
        let _ = svc.generate_forecast(
            &GenerateForecast::all_products(0.5).for_product("Nasi Lele").named("empty"),
            &a,
        );
        assert_eq!(svc.get_project("empty", &a).unwrap_err().kind(), ErrorKind::NotFound);
    }

    #[test]
    fn request_deserializes_from_frontend_shape() {
        let req: GenerateForecast = serde_json::from_value(serde_json::json!({
            "alpha": 0.4,
            "product_name": "Es Teh",
            "project_name": "Q1 Forecast"
        }))
        .unwrap();
        assert_eq!(
            req,
            GenerateForecast::all_products(0.4)
                .for_product("Es Teh")
                .named("Q1 Forecast")
        );
    }
}
