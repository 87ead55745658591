//! `MonitoringApi` implementation for `MonitoringClient`.
//!
//! Every method simply delegates to the corresponding inherent method on `MonitoringClient`.

use async_trait::async_trait;

use super::client::MonitoringClient;
use super::models::*;
use super::traits::MonitoringApi;

#[async_trait]
impl MonitoringApi for MonitoringClient {
    async fn find_graph_ids(&self, query: &GraphQuery) -> anyhow::Result<Vec<GraphId>> {
        self.find_graph_ids(query).await
    }

    async fn get_graphs_with_hosts(
        &self,
        graphids: &[GraphId],
    ) -> anyhow::Result<Vec<GraphSummary>> {
        self.get_graphs_with_hosts(graphids).await
    }

    async fn get_graph_layout(&self, graphid: GraphId) -> anyhow::Result<Option<GraphLayout>> {
        self.get_graph_layout(graphid).await
    }

    async fn get_hosts(&self, hostids: &[HostId]) -> anyhow::Result<Vec<Host>> {
        self.get_hosts(hostids).await
    }

    async fn get_item_ids_by_graphs(&self, graphids: &[GraphId]) -> anyhow::Result<Vec<ItemId>> {
        self.get_item_ids_by_graphs(graphids).await
    }

    async fn health_check(&self) -> anyhow::Result<bool> {
        self.health_check().await
    }
}
