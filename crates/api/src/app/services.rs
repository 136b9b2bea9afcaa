use std::sync::Arc;

use jawara_auth::{Permission, PermissionRoleGate, Principal, Role, RoleGate};
use jawara_core::{DomainError, DomainResult};
use jawara_infra::{ForecastService, InMemoryProjectStore, InMemorySalesLedger};
use jawara_sales::SalesRecord;

pub type Gate = PermissionRoleGate<fn(&Role) -> Vec<Permission>>;

pub type Service = ForecastService<
    Arc<InMemoryProjectStore>,
    Arc<InMemorySalesLedger>,
    Arc<InMemorySalesLedger>,
    Gate,
>;

/// Everything a handler needs, shared behind one `Arc`.
pub struct AppServices {
    pub forecasts: Service,
    pub ledger: Arc<InMemorySalesLedger>,
}

impl AppServices {
    pub fn in_memory() -> Self {
        Self::with_ledger(InMemorySalesLedger::arc())
    }

    pub fn with_ledger(ledger: Arc<InMemorySalesLedger>) -> Self {
        let forecasts = ForecastService::new(
            InMemoryProjectStore::arc(),
            ledger.clone(),
            ledger.clone(),
            PermissionRoleGate::standard(),
        );
        Self { forecasts, ledger }
    }

    /// Append sales to the ledger; all-or-nothing.
    pub fn record_sales(
        &self,
        records: Vec<SalesRecord>,
        principal: &Principal,
    ) -> DomainResult<usize> {
        if !self.forecasts.gate().can_record_sales(principal) {
            return Err(DomainError::unauthorized("principal may not record sales"));
        }
        let recorded = self.ledger.record_all(records)?;
        tracing::info!(recorded, principal = %principal.principal_id, "sales recorded");
        Ok(recorded)
    }
}
