//! Chart descriptors, item ids and multi-select option lists

use super::models::{Chart, ChartSource, GraphOption, MultiSelectOption};
use crate::monitoring::dims::graph_dims;
use crate::monitoring::{GraphId, HostId, ItemId, MonitoringApi};
use anyhow::Result;

/// Separator between host name and graph name in option labels
pub const NAME_DELIMITER: &str = ": ";

/// Builds the display parts of the charts view
pub struct ChartAssembler<'a> {
    api: &'a dyn MonitoringApi,
}

impl<'a> ChartAssembler<'a> {
    pub fn new(api: &'a dyn MonitoringApi) -> Self {
        Self { api }
    }

    /// One chart per graph, in the given order
    pub async fn charts_by_id(&self, graphids: &[GraphId]) -> Result<Vec<Chart>> {
        let mut charts = Vec::with_capacity(graphids.len());

        for &graphid in graphids {
            let layout = self.api.get_graph_layout(graphid).await?;
            let dimensions = graph_dims(layout.as_ref());

            let (sbox, src) = if dimensions.graph_type.is_pie_like() {
                (false, ChartSource::Pie)
            } else {
                (true, ChartSource::Graph)
            };

            charts.push(Chart {
                chartid: graphid,
                dimensions,
                sbox,
                src,
            });
        }

        Ok(charts)
    }

    /// Ids of all items drawn on the graphs
    pub async fn item_ids(&self, graphids: &[GraphId]) -> Result<Vec<ItemId>> {
        self.api.get_item_ids_by_graphs(graphids).await
    }

    /// Selected hosts as multi-select options
    pub async fn host_options(&self, hostids: &[HostId]) -> Result<Vec<MultiSelectOption<HostId>>> {
        Ok(self
            .api
            .get_hosts(hostids)
            .await?
            .into_iter()
            .map(|h| MultiSelectOption {
                id: h.hostid,
                name: h.name,
            })
            .collect())
    }

    /// Selected graphs as multi-select options, prefixed by their first host
    pub async fn graph_options(&self, graphids: &[GraphId]) -> Result<Vec<GraphOption>> {
        Ok(self
            .api
            .get_graphs_with_hosts(graphids)
            .await?
            .into_iter()
            .map(|g| GraphOption {
                id: g.graphid,
                prefix: g
                    .hosts
                    .first()
                    .map(|h| format!("{}{}", h.name, NAME_DELIMITER))
                    .unwrap_or_default(),
                name: g.name,
            })
            .collect())
    }
}

/// Patterns echoed as multi-select options
pub fn pattern_options(patterns: &[String]) -> Vec<MultiSelectOption<String>> {
    patterns
        .iter()
        .map(|p| MultiSelectOption {
            id: p.clone(),
            name: p.clone(),
        })
        .collect()
}
