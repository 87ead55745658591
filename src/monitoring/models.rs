//! Monitoring API entities and query shapes

use serde::{Deserialize, Deserializer, Serialize};

pub type GraphId = u64;
pub type HostId = u64;
pub type ItemId = u64;

/// Helper to deserialize ids that the API returns as JSON strings ("10084")
pub(crate) fn deserialize_id<'de, D>(deserializer: D) -> Result<u64, D::Error>
where
    D: Deserializer<'de>,
{
    use serde::de::Error;

    #[derive(Deserialize)]
    #[serde(untagged)]
    enum StrOrNum {
        Str(String),
        Num(u64),
    }

    match StrOrNum::deserialize(deserializer)? {
        StrOrNum::Str(s) => s.parse().map_err(D::Error::custom),
        StrOrNum::Num(n) => Ok(n),
    }
}

/// Helper for numeric enums that the API returns as strings ("2")
fn deserialize_i32<'de, D>(deserializer: D) -> Result<i32, D::Error>
where
    D: Deserializer<'de>,
{
    deserialize_id(deserializer).and_then(|n| i32::try_from(n).map_err(serde::de::Error::custom))
}

// ============================================================================
// Graph type
// ============================================================================

/// Rendering type of a graph
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum GraphType {
    #[default]
    Normal,
    Stacked,
    Pie,
    Exploded,
}

impl GraphType {
    /// Map the API's numeric code; unknown codes render as normal graphs
    pub fn from_code(code: i32) -> Self {
        match code {
            1 => GraphType::Stacked,
            2 => GraphType::Pie,
            3 => GraphType::Exploded,
            _ => GraphType::Normal,
        }
    }

    /// Pie and exploded graphs are drawn without the time-range selection box
    pub fn is_pie_like(&self) -> bool {
        matches!(self, GraphType::Pie | GraphType::Exploded)
    }
}

// ============================================================================
// Entities
// ============================================================================

/// Host reference attached to a graph
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HostRef {
    pub name: String,
}

/// A graph with its name and hosts (multi-select display)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GraphSummary {
    #[serde(deserialize_with = "deserialize_id")]
    pub graphid: GraphId,
    pub name: String,
    #[serde(default)]
    pub hosts: Vec<HostRef>,
}

/// A monitored host
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Host {
    #[serde(deserialize_with = "deserialize_id")]
    pub hostid: HostId,
    pub name: String,
}

/// Y-axis side of a graph item
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct GraphItemAxis {
    #[serde(deserialize_with = "deserialize_i32")]
    pub yaxisside: i32,
}

/// Layout attributes needed to compute chart dimensions
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct GraphLayout {
    #[serde(deserialize_with = "deserialize_i32")]
    pub graphtype: i32,
    #[serde(deserialize_with = "deserialize_i32")]
    pub height: i32,
    #[serde(default)]
    pub gitems: Vec<GraphItemAxis>,
}

/// Chart dimensions consumed by the chart renderer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct GraphDims {
    #[serde(rename = "shiftYtop")]
    pub shift_y_top: i32,
    #[serde(rename = "shiftXleft")]
    pub shift_x_left: i32,
    #[serde(rename = "shiftXright")]
    pub shift_x_right: i32,
    #[serde(rename = "graphHeight")]
    pub graph_height: i32,
    #[serde(rename = "graphtype")]
    pub graph_type: GraphType,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub yaxis: Option<i32>,
}

// ============================================================================
// Queries
// ============================================================================

/// Host-scoped graph lookup
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GraphQuery {
    /// Hosts the graphs must belong to
    pub hostids: Vec<HostId>,
    /// Restrict to these graph ids
    pub graphids: Option<Vec<GraphId>>,
    /// Name wildcard patterns, matched with OR semantics
    pub name_patterns: Option<Vec<String>>,
    /// Maximum number of ids returned
    pub limit: Option<usize>,
}

impl GraphQuery {
    pub fn for_hosts(hostids: &[HostId]) -> Self {
        Self {
            hostids: hostids.to_vec(),
            ..Default::default()
        }
    }

    pub fn with_graphids(mut self, graphids: &[GraphId]) -> Self {
        self.graphids = Some(graphids.to_vec());
        self
    }

    pub fn with_name_patterns(mut self, patterns: &[String]) -> Self {
        self.name_patterns = Some(patterns.to_vec());
        self
    }

    pub fn with_limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }
}
