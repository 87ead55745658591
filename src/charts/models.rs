//! Charts view request and view-model types

use crate::monitoring::{GraphDims, GraphId, HostId, ItemId};
use crate::timeline::Timeline;
use serde::Serialize;

// ============================================================================
// Enumerations
// ============================================================================

/// How resolved graphs are presented
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ViewAs {
    #[default]
    Graph,
    Values,
}

impl ViewAs {
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "graph" => Some(ViewAs::Graph),
            "values" => Some(ViewAs::Values),
            _ => None,
        }
    }
}

/// Graph filter mode
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SearchType {
    /// Graphs selected by explicit id
    #[default]
    Strict,
    /// Graphs selected by wildcard name match
    Pattern,
}

impl SearchType {
    /// Accepts the names and the stored numeric codes
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "strict" | "0" => Some(SearchType::Strict),
            "pattern" | "1" => Some(SearchType::Pattern),
            _ => None,
        }
    }

    /// Numeric code persisted in the profile store
    pub fn code(&self) -> i64 {
        match self {
            SearchType::Strict => 0,
            SearchType::Pattern => 1,
        }
    }

    /// Unknown codes are treated as strict
    pub fn from_code(code: i64) -> Self {
        if code == 1 {
            SearchType::Pattern
        } else {
            SearchType::Strict
        }
    }
}

// ============================================================================
// Request
// ============================================================================

/// Validated charts view input. `None` means the field was not supplied.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ChartsViewRequest {
    pub from: Option<String>,
    pub to: Option<String>,
    pub view_as: Option<ViewAs>,
    pub filter_set: bool,
    pub filter_rst: bool,
    pub filter_search_type: Option<SearchType>,
    pub filter_hostids: Option<Vec<HostId>>,
    pub filter_graphids: Option<Vec<GraphId>>,
    pub filter_graph_patterns: Option<Vec<String>>,
    pub page: Option<u32>,
}

/// Effective graph filter after falling back to stored preferences
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterState {
    pub search_type: SearchType,
    pub hostids: Vec<HostId>,
    pub graphids: Vec<GraphId>,
    pub graph_patterns: Vec<String>,
}

// ============================================================================
// View model
// ============================================================================

/// Rendering endpoint of a chart
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ChartSource {
    /// Line and stacked graphs
    #[serde(rename = "chart2.php")]
    Graph,
    /// Pie and exploded graphs
    #[serde(rename = "chart6.php")]
    Pie,
}

/// Render descriptor of one graph
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Chart {
    pub chartid: GraphId,
    pub dimensions: GraphDims,
    /// Whether the chart supports time-range selection by dragging
    pub sbox: bool,
    pub src: ChartSource,
}

/// Multi-select option for hosts and patterns
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MultiSelectOption<T> {
    pub id: T,
    pub name: String,
}

/// Multi-select option for graphs, shown as "<host>: <graph>"
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GraphOption {
    pub id: GraphId,
    pub name: String,
    pub prefix: String,
}

/// Everything the charts page renders
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChartsView {
    pub view_as: ViewAs,
    pub graphids: Vec<GraphId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub itemids: Option<Vec<ItemId>>,
    pub charts: Vec<Chart>,
    pub ms_hosts: Vec<MultiSelectOption<HostId>>,
    pub ms_graphs: Vec<GraphOption>,
    pub ms_graph_patterns: Vec<MultiSelectOption<String>>,
    pub timeline: Timeline,
    pub active_tab: i64,
    pub filter_search_type: SearchType,
    pub filter_hostids: Vec<HostId>,
    pub filter_graphids: Vec<GraphId>,
    pub filter_graph_patterns: Vec<String>,
    pub must_specify_host: bool,
    pub page: u32,
}
