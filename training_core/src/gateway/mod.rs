//! Read-only access to the training catalog.
//!
//! The [`CatalogGateway`] trait is the seam between the navigation layer and
//! wherever the catalog lives:
//! - [`HttpGateway`] talks to the catalog service under `{base_url}/api`
//! - [`StaticGateway`] serves an in-memory [`Catalog`](crate::Catalog)
//!
//! Every call returns a fresh, owned tree. Nothing is cached here.

mod http;
mod memory;

pub use http::HttpGateway;
pub use memory::StaticGateway;

use crate::types::*;
use crate::Result;
use async_trait::async_trait;

/// Source of catalog data
///
/// Transport failures surface as [`Error::Transport`](crate::Error::Transport);
/// unknown mesocycle ids as [`Error::NotFound`](crate::Error::NotFound).
#[async_trait]
pub trait CatalogGateway: Send + Sync {
    async fn list_mesocycles(&self) -> Result<Vec<Mesocycle>>;

    async fn get_mesocycle(&self, id: MesocycleId) -> Result<Mesocycle>;

    /// Mesocycle with its objectives and full session/exercise tree
    async fn get_mesocycle_detail(&self, id: MesocycleId) -> Result<MesocycleDetail>;

    async fn list_sessions_of_mesocycle(&self, id: MesocycleId) -> Result<Vec<WeeklyBlock>>;

    async fn get_full_plan(&self) -> Result<FullPlan>;

    async fn get_basic_material(&self) -> Result<Vec<String>>;

    /// Ask the service to seed its catalog; a no-op when already seeded
    async fn init_data(&self) -> Result<ServiceMessage>;

    async fn health(&self) -> Result<ServiceMessage>;
}
