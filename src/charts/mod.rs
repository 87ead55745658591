//! Charts view
//!
//! Composes the filter, the time selector, graph resolution and chart
//! assembly into the view-model of the charts listing page.

pub mod assembler;
pub mod filter;
pub mod models;
pub mod resolver;

pub use models::*;

use crate::monitoring::MonitoringApi;
use crate::profile::{ProfileStore, UserId, UserProfile};
use crate::timeline::{PeriodLimits, TimeSelector};
use anyhow::Result;
use assembler::{pattern_options, ChartAssembler};
use chrono::{DateTime, Utc};
use resolver::{must_specify_host, GraphResolver};
use std::sync::Arc;
use tracing::debug;

/// Page title of the charts view
pub const PAGE_TITLE: &str = "Custom graphs";
/// Profile key prefix of the time selector
pub const TIMELINE_PROFILE_IDX: &str = "web.graphs.filter";
/// Default cap on resolved graphs
pub const DEFAULT_MAX_GRAPHS_PER_PAGE: usize = 20;

/// Tunables of the charts view
#[derive(Debug, Clone)]
pub struct ChartsSettings {
    pub max_graphs_per_page: usize,
    pub period_limits: PeriodLimits,
}

impl Default for ChartsSettings {
    fn default() -> Self {
        Self {
            max_graphs_per_page: DEFAULT_MAX_GRAPHS_PER_PAGE,
            period_limits: PeriodLimits::default(),
        }
    }
}

/// Builds the charts view for validated requests
pub struct ChartsController {
    api: Arc<dyn MonitoringApi>,
    profiles: Arc<dyn ProfileStore>,
    settings: ChartsSettings,
}

impl ChartsController {
    pub fn new(
        api: Arc<dyn MonitoringApi>,
        profiles: Arc<dyn ProfileStore>,
        settings: ChartsSettings,
    ) -> Self {
        Self {
            api,
            profiles,
            settings,
        }
    }

    pub fn settings(&self) -> &ChartsSettings {
        &self.settings
    }

    pub fn api(&self) -> &dyn MonitoringApi {
        self.api.as_ref()
    }

    /// Build the view for one user. The request must already be validated.
    pub async fn view(
        &self,
        user_id: UserId,
        request: &ChartsViewRequest,
        now: DateTime<Utc>,
    ) -> Result<ChartsView> {
        let profile = UserProfile::new(self.profiles.as_ref(), user_id);

        filter::apply_action(&profile, request).await?;
        let filter = filter::load_filter(&profile, request).await?;

        let selector = TimeSelector::new(&profile, TIMELINE_PROFILE_IDX, 0);
        let (from, to) = (request.from.as_deref(), request.to.as_deref());
        selector.update(from, to).await?;
        let timeline = selector.period(from, to, now).await?;

        let active_tab = profile.get_int(filter::ACTIVE_TAB_KEY, 1).await?;
        let assembler = ChartAssembler::new(self.api.as_ref());

        let ms_graph_patterns = if filter.search_type == SearchType::Pattern {
            pattern_options(&filter.graph_patterns)
        } else {
            Vec::new()
        };

        let ms_graphs = if filter.search_type == SearchType::Strict && !filter.graphids.is_empty() {
            assembler.graph_options(&filter.graphids).await?
        } else {
            Vec::new()
        };

        let ms_hosts = if filter.hostids.is_empty() {
            Vec::new()
        } else {
            assembler.host_options(&filter.hostids).await?
        };

        let must_specify_host = must_specify_host(&filter);
        let graphids = GraphResolver::new(self.api.as_ref(), self.settings.max_graphs_per_page)
            .resolve(&filter)
            .await?;

        let view_as = request.view_as.unwrap_or_default();
        let mut itemids = None;
        let mut charts = Vec::new();

        if !graphids.is_empty() {
            match view_as {
                ViewAs::Values => itemids = Some(assembler.item_ids(&graphids).await?),
                ViewAs::Graph => charts = assembler.charts_by_id(&graphids).await?,
            }
        }

        debug!(
            user_id,
            search_type = ?filter.search_type,
            graphs = graphids.len(),
            must_specify_host,
            "Built charts view"
        );

        Ok(ChartsView {
            view_as,
            graphids,
            itemids,
            charts,
            ms_hosts,
            ms_graphs,
            ms_graph_patterns,
            timeline,
            active_tab,
            filter_search_type: filter.search_type,
            filter_hostids: filter.hostids,
            filter_graphids: filter.graphids,
            filter_graph_patterns: filter.graph_patterns,
            must_specify_host,
            page: request.page.unwrap_or(1),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::monitoring::mock::{MockGraph, MockMonitoringApi};
    use crate::profile::MemoryProfileStore;
    use chrono::TimeZone;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 5, 15, 13, 45, 30).unwrap()
    }

    async fn seeded() -> (Arc<MockMonitoringApi>, Arc<MemoryProfileStore>, ChartsController) {
        let api = Arc::new(MockMonitoringApi::new());
        api.add_host(5, "web-01").await;
        api.add_host(6, "db-01").await;
        api.add_graph(MockGraph::new(10, "Web requests", &[5], &[100, 101]))
            .await;
        api.add_graph(MockGraph::new(11, "CPU load", &[5], &[102])).await;
        api.add_graph(MockGraph::new(12, "Disk usage", &[5], &[103]).with_graphtype(2))
            .await;
        api.add_graph(MockGraph::new(20, "DB queries", &[6], &[200])).await;

        let profiles = Arc::new(MemoryProfileStore::new());
        let controller = ChartsController::new(
            api.clone(),
            profiles.clone(),
            ChartsSettings::default(),
        );
        (api, profiles, controller)
    }

    #[tokio::test]
    async fn test_empty_filter_requires_host() {
        let (api, _, controller) = seeded().await;

        let view = controller
            .view(1, &ChartsViewRequest::default(), now())
            .await
            .unwrap();

        assert!(view.must_specify_host);
        assert!(view.graphids.is_empty());
        assert!(view.charts.is_empty());
        assert!(view.itemids.is_none());
        assert_eq!(view.page, 1);
        assert_eq!(view.active_tab, 1);
        assert_eq!(view.view_as, ViewAs::Graph);
        assert_eq!(view.timeline.from, "now-1h");
        assert_eq!(api.graph_query_count().await, 0);
    }

    #[tokio::test]
    async fn test_strict_graph_view() {
        let (api, _, controller) = seeded().await;

        let request = ChartsViewRequest {
            filter_hostids: Some(vec![5]),
            filter_graphids: Some(vec![11, 12]),
            page: Some(2),
            ..Default::default()
        };
        let view = controller.view(1, &request, now()).await.unwrap();

        assert!(!view.must_specify_host);
        assert_eq!(view.graphids, vec![11, 12]);
        assert_eq!(view.charts.len(), 2);
        assert_eq!(view.charts[1].src, ChartSource::Pie);
        assert_eq!(view.ms_hosts.len(), 1);
        assert_eq!(view.ms_graphs.len(), 2);
        assert_eq!(view.ms_graphs[0].prefix, "web-01: ");
        assert!(view.ms_graph_patterns.is_empty());
        assert_eq!(view.page, 2);
        assert_eq!(*api.layout_requests.read().await, vec![11, 12]);
    }

    #[tokio::test]
    async fn test_values_view_lists_items() {
        let (api, _, controller) = seeded().await;

        let request = ChartsViewRequest {
            view_as: Some(ViewAs::Values),
            filter_graphids: Some(vec![10, 20]),
            ..Default::default()
        };
        let view = controller.view(1, &request, now()).await.unwrap();

        assert_eq!(view.graphids, vec![10, 20]);
        assert_eq!(view.itemids, Some(vec![100, 101, 200]));
        assert!(view.charts.is_empty());
        assert!(view.ms_hosts.is_empty());
        assert!(api.layout_requests.read().await.is_empty());
    }

    #[tokio::test]
    async fn test_pattern_filter_set_then_reused() {
        let (_, _, controller) = seeded().await;

        let request = ChartsViewRequest {
            filter_set: true,
            filter_search_type: Some(SearchType::Pattern),
            filter_hostids: Some(vec![5]),
            filter_graph_patterns: Some(vec!["web*".to_string()]),
            ..Default::default()
        };
        let view = controller.view(1, &request, now()).await.unwrap();
        assert_eq!(view.graphids, vec![10]);
        assert_eq!(view.ms_graph_patterns.len(), 1);
        assert!(view.ms_graphs.is_empty());

        // A later plain request falls back to the stored filter
        let view = controller
            .view(1, &ChartsViewRequest::default(), now())
            .await
            .unwrap();
        assert_eq!(view.filter_search_type, SearchType::Pattern);
        assert_eq!(view.filter_hostids, vec![5]);
        assert_eq!(view.filter_graph_patterns, vec!["web*"]);
        assert_eq!(view.graphids, vec![10]);

        // Other users are unaffected
        let view = controller
            .view(2, &ChartsViewRequest::default(), now())
            .await
            .unwrap();
        assert!(view.must_specify_host);
    }

    #[tokio::test]
    async fn test_reset_returns_to_defaults() {
        let (_, profiles, controller) = seeded().await;

        let set = ChartsViewRequest {
            filter_set: true,
            filter_hostids: Some(vec![5]),
            ..Default::default()
        };
        controller.view(1, &set, now()).await.unwrap();

        let reset = ChartsViewRequest {
            filter_rst: true,
            ..Default::default()
        };
        let view = controller.view(1, &reset, now()).await.unwrap();
        assert!(view.must_specify_host);
        assert!(view.filter_hostids.is_empty());
        assert!(profiles.is_empty().await);
    }

    #[tokio::test]
    async fn test_time_range_persisted() {
        let (_, _, controller) = seeded().await;

        let request = ChartsViewRequest {
            from: Some("now-1d".to_string()),
            to: Some("now".to_string()),
            ..Default::default()
        };
        controller.view(1, &request, now()).await.unwrap();

        let view = controller
            .view(1, &ChartsViewRequest::default(), now())
            .await
            .unwrap();
        assert_eq!(view.timeline.from, "now-1d");
        assert_eq!(view.timeline.to_ts - view.timeline.from_ts, 86_400);
    }

    #[tokio::test]
    async fn test_resolution_capped() {
        let api = Arc::new(MockMonitoringApi::new());
        for id in 1..=30 {
            api.add_graph(MockGraph::new(id, "g", &[5], &[])).await;
        }
        let controller = ChartsController::new(
            api,
            Arc::new(MemoryProfileStore::new()),
            ChartsSettings::default(),
        );

        let request = ChartsViewRequest {
            filter_hostids: Some(vec![5]),
            ..Default::default()
        };
        let view = controller.view(1, &request, now()).await.unwrap();
        assert_eq!(view.graphids.len(), DEFAULT_MAX_GRAPHS_PER_PAGE);
        assert_eq!(view.charts.len(), DEFAULT_MAX_GRAPHS_PER_PAGE);
    }
}
