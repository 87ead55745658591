//! MonitoringApi trait definition
//!
//! Defines the abstract interface for the entity lookups the charts view
//! needs from the monitoring backend. `MonitoringClient` implements it over
//! JSON-RPC; tests use an in-memory mock.

use super::models::*;
use anyhow::Result;
use async_trait::async_trait;

/// Abstract interface for graph/host/item lookups.
#[async_trait]
pub trait MonitoringApi: Send + Sync {
    // ========================================================================
    // Graphs
    // ========================================================================

    /// Ids of graphs matching a host-scoped query, in backend order
    async fn find_graph_ids(&self, query: &GraphQuery) -> Result<Vec<GraphId>>;

    /// Graphs by id, with their names and host names
    async fn get_graphs_with_hosts(&self, graphids: &[GraphId]) -> Result<Vec<GraphSummary>>;

    /// Layout attributes of a single graph, `None` if it does not exist
    async fn get_graph_layout(&self, graphid: GraphId) -> Result<Option<GraphLayout>>;

    // ========================================================================
    // Hosts and items
    // ========================================================================

    /// Hosts by id
    async fn get_hosts(&self, hostids: &[HostId]) -> Result<Vec<Host>>;

    /// Ids of the items drawn on the given graphs
    async fn get_item_ids_by_graphs(&self, graphids: &[GraphId]) -> Result<Vec<ItemId>>;

    // ========================================================================
    // Health
    // ========================================================================

    /// Check whether the backend answers
    async fn health_check(&self) -> Result<bool>;
}
