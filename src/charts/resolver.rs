//! Graph id resolution
//!
//! Turns the effective filter into the list of graph ids to display, either
//! by explicit host/graph ids (strict) or by name patterns (pattern).

use super::models::{FilterState, SearchType};
use crate::monitoring::{GraphId, GraphQuery, HostId, MonitoringApi};
use anyhow::Result;
use tracing::debug;

/// Pattern that selects every graph of the chosen hosts
pub const MATCH_ALL_PATTERN: &str = "*";

/// A host must be chosen unless strict mode already names graphs
pub fn must_specify_host(filter: &FilterState) -> bool {
    let strict_with_graphs =
        filter.search_type == SearchType::Strict && !filter.graphids.is_empty();
    !(strict_with_graphs || !filter.hostids.is_empty())
}

/// Resolves graph ids through the monitoring API
pub struct GraphResolver<'a> {
    api: &'a dyn MonitoringApi,
    limit: usize,
}

impl<'a> GraphResolver<'a> {
    pub fn new(api: &'a dyn MonitoringApi, limit: usize) -> Self {
        Self { api, limit }
    }

    /// Graph ids for the filter, empty when a host still has to be chosen
    pub async fn resolve(&self, filter: &FilterState) -> Result<Vec<GraphId>> {
        if must_specify_host(filter) {
            return Ok(Vec::new());
        }

        match filter.search_type {
            SearchType::Strict => self.by_hostids(&filter.hostids, &filter.graphids).await,
            SearchType::Pattern => {
                self.by_patterns(&filter.graph_patterns, &filter.hostids)
                    .await
            }
        }
    }

    /// Graphs of the given hosts, narrowed to `graphids` when both are given.
    /// Without hosts the graph ids are returned unchanged.
    pub async fn by_hostids(
        &self,
        hostids: &[HostId],
        graphids: &[GraphId],
    ) -> Result<Vec<GraphId>> {
        if hostids.is_empty() && !graphids.is_empty() {
            return Ok(graphids.to_vec());
        }

        let mut query = GraphQuery::for_hosts(hostids).with_limit(self.limit);
        if !hostids.is_empty() && !graphids.is_empty() {
            query = query.with_graphids(graphids);
        }

        let ids = self.api.find_graph_ids(&query).await?;
        debug!(hosts = hostids.len(), found = ids.len(), "Resolved graphs by host");
        Ok(ids)
    }

    /// Graphs of the given hosts whose name matches any pattern. Empty
    /// patterns are skipped; with none left, or with the match-all pattern,
    /// every graph of the hosts is returned.
    pub async fn by_patterns(
        &self,
        patterns: &[String],
        hostids: &[HostId],
    ) -> Result<Vec<GraphId>> {
        let patterns: Vec<String> = patterns.iter().filter(|p| !p.is_empty()).cloned().collect();

        let mut query = GraphQuery::for_hosts(hostids).with_limit(self.limit);
        if !patterns.is_empty() && !patterns.iter().any(|p| p == MATCH_ALL_PATTERN) {
            query = query.with_name_patterns(&patterns);
        }

        let ids = self.api.find_graph_ids(&query).await?;
        debug!(patterns = patterns.len(), found = ids.len(), "Resolved graphs by pattern");
        Ok(ids)
    }
}
