//! In-memory mock implementation of MonitoringApi for testing.
//!
//! Graphs and hosts live in `tokio::sync::RwLock<BTreeMap<K, V>>` collections,
//! so lookups come back in id order. Every host-scoped graph query is recorded
//! so tests can assert which lookups a code path performed.
//! Conditionally compiled with `#[cfg(test)]`.

use super::models::*;
use super::traits::MonitoringApi;
use anyhow::Result;
use async_trait::async_trait;
use std::collections::BTreeMap;
use tokio::sync::RwLock;

/// A graph as stored by the mock backend
#[derive(Debug, Clone)]
pub struct MockGraph {
    pub graphid: GraphId,
    pub name: String,
    pub hostids: Vec<HostId>,
    pub graphtype: i32,
    pub height: i32,
    pub item_sides: Vec<i32>,
    pub itemids: Vec<ItemId>,
}

impl MockGraph {
    /// A normal graph with one left-axis item per item id
    pub fn new(graphid: GraphId, name: &str, hostids: &[HostId], itemids: &[ItemId]) -> Self {
        Self {
            graphid,
            name: name.to_string(),
            hostids: hostids.to_vec(),
            graphtype: 0,
            height: 200,
            item_sides: vec![0; itemids.len()],
            itemids: itemids.to_vec(),
        }
    }

    pub fn with_graphtype(mut self, graphtype: i32) -> Self {
        self.graphtype = graphtype;
        self
    }
}

/// In-memory mock implementation of MonitoringApi for testing.
pub struct MockMonitoringApi {
    pub graphs: RwLock<BTreeMap<GraphId, MockGraph>>,
    pub hosts: RwLock<BTreeMap<HostId, Host>>,
    /// Every query passed to `find_graph_ids`
    pub graph_queries: RwLock<Vec<GraphQuery>>,
    /// Graph ids passed to `get_graph_layout`, in call order
    pub layout_requests: RwLock<Vec<GraphId>>,
    pub healthy: bool,
}

impl MockMonitoringApi {
    /// Create a new empty MockMonitoringApi.
    pub fn new() -> Self {
        Self {
            graphs: RwLock::new(BTreeMap::new()),
            hosts: RwLock::new(BTreeMap::new()),
            graph_queries: RwLock::new(Vec::new()),
            layout_requests: RwLock::new(Vec::new()),
            healthy: true,
        }
    }

    pub async fn add_host(&self, hostid: HostId, name: &str) {
        self.hosts.write().await.insert(
            hostid,
            Host {
                hostid,
                name: name.to_string(),
            },
        );
    }

    pub async fn add_graph(&self, graph: MockGraph) {
        self.graphs.write().await.insert(graph.graphid, graph);
    }

    /// Number of host-scoped graph queries performed so far
    pub async fn graph_query_count(&self) -> usize {
        self.graph_queries.read().await.len()
    }
}

impl Default for MockMonitoringApi {
    fn default() -> Self {
        Self::new()
    }
}

/// Case-insensitive full match where `*` stands for any run of characters
pub fn wildcard_match(pattern: &str, name: &str) -> bool {
    let pattern: Vec<char> = pattern.to_lowercase().chars().collect();
    let name: Vec<char> = name.to_lowercase().chars().collect();

    let (mut p, mut n) = (0, 0);
    let mut star: Option<(usize, usize)> = None;

    while n < name.len() {
        if p < pattern.len() && pattern[p] == '*' {
            star = Some((p, n));
            p += 1;
        } else if p < pattern.len() && pattern[p] == name[n] {
            p += 1;
            n += 1;
        } else if let Some((sp, sn)) = star {
            p = sp + 1;
            n = sn + 1;
            star = Some((sp, sn + 1));
        } else {
            return false;
        }
    }

    pattern[p..].iter().all(|&c| c == '*')
}

#[async_trait]
impl MonitoringApi for MockMonitoringApi {
    async fn find_graph_ids(&self, query: &GraphQuery) -> Result<Vec<GraphId>> {
        self.graph_queries.write().await.push(query.clone());

        let graphs = self.graphs.read().await;
        let ids = graphs
            .values()
            .filter(|g| g.hostids.iter().any(|h| query.hostids.contains(h)))
            .filter(|g| {
                query
                    .graphids
                    .as_ref()
                    .is_none_or(|ids| ids.contains(&g.graphid))
            })
            .filter(|g| {
                query.name_patterns.as_ref().is_none_or(|patterns| {
                    let mut patterns = patterns.iter().filter(|p| !p.is_empty()).peekable();
                    patterns.peek().is_none() || patterns.any(|p| wildcard_match(p, &g.name))
                })
            })
            .map(|g| g.graphid)
            .take(query.limit.unwrap_or(usize::MAX))
            .collect();

        Ok(ids)
    }

    async fn get_graphs_with_hosts(&self, graphids: &[GraphId]) -> Result<Vec<GraphSummary>> {
        let graphs = self.graphs.read().await;
        let hosts = self.hosts.read().await;

        Ok(graphs
            .values()
            .filter(|g| graphids.contains(&g.graphid))
            .map(|g| GraphSummary {
                graphid: g.graphid,
                name: g.name.clone(),
                hosts: g
                    .hostids
                    .iter()
                    .filter_map(|h| hosts.get(h))
                    .map(|h| HostRef {
                        name: h.name.clone(),
                    })
                    .collect(),
            })
            .collect())
    }

    async fn get_graph_layout(&self, graphid: GraphId) -> Result<Option<GraphLayout>> {
        self.layout_requests.write().await.push(graphid);

        Ok(self.graphs.read().await.get(&graphid).map(|g| GraphLayout {
            graphtype: g.graphtype,
            height: g.height,
            gitems: g
                .item_sides
                .iter()
                .map(|&yaxisside| GraphItemAxis { yaxisside })
                .collect(),
        }))
    }

    async fn get_hosts(&self, hostids: &[HostId]) -> Result<Vec<Host>> {
        Ok(self
            .hosts
            .read()
            .await
            .values()
            .filter(|h| hostids.contains(&h.hostid))
            .cloned()
            .collect())
    }

    async fn get_item_ids_by_graphs(&self, graphids: &[GraphId]) -> Result<Vec<ItemId>> {
        let graphs = self.graphs.read().await;
        let mut ids: Vec<ItemId> = graphids
            .iter()
            .filter_map(|id| graphs.get(id))
            .flat_map(|g| g.itemids.iter().copied())
            .collect();
        ids.sort_unstable();
        ids.dedup();
        Ok(ids)
    }

    async fn health_check(&self) -> Result<bool> {
        Ok(self.healthy)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wildcard_match() {
        assert!(wildcard_match("web*", "Web server load"));
        assert!(wildcard_match("*load", "CPU load"));
        assert!(wildcard_match("*", "anything"));
        assert!(wildcard_match("CPU*util*", "cpu utilization"));
        assert!(!wildcard_match("web*", "CPU load"));
        assert!(!wildcard_match("load", "CPU load"));
    }

    #[tokio::test]
    async fn test_find_graph_ids_respects_limit_and_hosts() {
        let api = MockMonitoringApi::new();
        for id in 1..=5 {
            api.add_graph(MockGraph::new(id, "g", &[5], &[])).await;
        }
        api.add_graph(MockGraph::new(6, "g", &[6], &[])).await;

        let ids = api
            .find_graph_ids(&GraphQuery::for_hosts(&[5]).with_limit(3))
            .await
            .unwrap();
        assert_eq!(ids, vec![1, 2, 3]);
        assert_eq!(api.graph_query_count().await, 1);
    }

    #[tokio::test]
    async fn test_empty_name_patterns_ignored() {
        let api = MockMonitoringApi::new();
        api.add_graph(MockGraph::new(1, "Web requests", &[5], &[])).await;
        api.add_graph(MockGraph::new(2, "CPU load", &[5], &[])).await;

        let blank = GraphQuery::for_hosts(&[5]).with_name_patterns(&["".to_string()]);
        assert_eq!(api.find_graph_ids(&blank).await.unwrap(), vec![1, 2]);

        let mixed = GraphQuery::for_hosts(&[5])
            .with_name_patterns(&["".to_string(), "cpu*".to_string()]);
        assert_eq!(api.find_graph_ids(&mixed).await.unwrap(), vec![2]);
    }

    #[tokio::test]
    async fn test_item_ids_deduplicated() {
        let api = MockMonitoringApi::new();
        api.add_graph(MockGraph::new(1, "a", &[5], &[100, 101])).await;
        api.add_graph(MockGraph::new(2, "b", &[5], &[101, 102])).await;

        let ids = api.get_item_ids_by_graphs(&[1, 2]).await.unwrap();
        assert_eq!(ids, vec![100, 101, 102]);
    }
}
