use super::CatalogGateway;
use crate::catalog::get_default_catalog;
use crate::types::*;
use crate::Result;
use async_trait::async_trait;
use std::sync::Arc;

/// Catalog gateway serving an in-memory catalog
///
/// Backs `--offline` mode. Each call clones out of the shared catalog so
/// callers own what they receive, as with the HTTP gateway.
#[derive(Clone, Debug)]
pub struct StaticGateway {
    catalog: Arc<Catalog>,
}

impl StaticGateway {
    pub fn new(catalog: Catalog) -> Self {
        Self {
            catalog: Arc::new(catalog),
        }
    }

    /// Gateway over the built-in seed catalog
    pub fn seeded() -> Self {
        Self::new(get_default_catalog().clone())
    }
}

impl Default for StaticGateway {
    fn default() -> Self {
        Self::seeded()
    }
}

#[async_trait]
impl CatalogGateway for StaticGateway {
    async fn list_mesocycles(&self) -> Result<Vec<Mesocycle>> {
        Ok(self.catalog.mesocycles().to_vec())
    }

    async fn get_mesocycle(&self, id: MesocycleId) -> Result<Mesocycle> {
        self.catalog.mesocycle(id).cloned()
    }

    async fn get_mesocycle_detail(&self, id: MesocycleId) -> Result<MesocycleDetail> {
        self.catalog.mesocycle_detail(id)
    }

    async fn list_sessions_of_mesocycle(&self, id: MesocycleId) -> Result<Vec<WeeklyBlock>> {
        Ok(self.catalog.weekly_blocks_of(id))
    }

    async fn get_full_plan(&self) -> Result<FullPlan> {
        Ok(self.catalog.plan.clone())
    }

    async fn get_basic_material(&self) -> Result<Vec<String>> {
        Ok(self.catalog.plan.basic_material.clone())
    }

    async fn init_data(&self) -> Result<ServiceMessage> {
        Ok(ServiceMessage {
            message: "Data initialized successfully".into(),
        })
    }

    async fn health(&self) -> Result<ServiceMessage> {
        Ok(ServiceMessage {
            message: "Football Training API is running".into(),
        })
    }
}
