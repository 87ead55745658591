//! JSON-RPC client for the monitoring API

use super::models::*;
use anyhow::{Context, Result};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;
use tracing::debug;

/// Endpoint path of the JSON-RPC entry point, relative to the base URL
pub const RPC_PATH: &str = "api_jsonrpc.php";

/// Error object returned by the API in place of a result
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, thiserror::Error)]
#[error("{method} failed ({code}): {message} {data}")]
pub struct RpcError {
    #[serde(default)]
    pub method: String,
    pub code: i64,
    pub message: String,
    #[serde(default)]
    pub data: String,
}

#[derive(Serialize)]
struct RpcRequest<'a> {
    jsonrpc: &'static str,
    method: &'a str,
    params: Value,
    id: u64,
}

#[derive(Deserialize)]
struct RpcResponse<T> {
    result: Option<T>,
    error: Option<RpcError>,
}

#[derive(Deserialize)]
struct GraphIdRow {
    #[serde(deserialize_with = "deserialize_id")]
    graphid: GraphId,
}

#[derive(Deserialize)]
struct ItemIdRow {
    #[serde(deserialize_with = "deserialize_id")]
    itemid: ItemId,
}

/// Client for monitoring API operations
pub struct MonitoringClient {
    http_client: reqwest::Client,
    url: String,
    token: Option<String>,
    next_id: AtomicU64,
}

impl MonitoringClient {
    /// Create a new client for the API rooted at `base_url`
    pub fn new(base_url: &str, token: Option<String>, timeout: Duration) -> Result<Self> {
        let http_client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .context("Failed to create monitoring API HTTP client")?;

        let url = format!("{}/{}", base_url.trim_end_matches('/'), RPC_PATH);

        Ok(Self {
            http_client,
            url,
            token: token.filter(|t| !t.is_empty()),
            next_id: AtomicU64::new(1),
        })
    }

    /// Full URL requests are posted to
    pub fn url(&self) -> &str {
        &self.url
    }

    /// Call a JSON-RPC method and decode its result
    async fn call<T: DeserializeOwned>(
        &self,
        method: &str,
        params: Value,
        authed: bool,
    ) -> Result<T> {
        let request = RpcRequest {
            jsonrpc: "2.0",
            method,
            params,
            id: self.next_id.fetch_add(1, Ordering::Relaxed),
        };

        debug!(method, id = request.id, "Calling monitoring API");

        let mut builder = self.http_client.post(&self.url).json(&request);
        if authed {
            if let Some(ref token) = self.token {
                builder = builder.bearer_auth(token);
            }
        }

        let response: RpcResponse<T> = builder
            .send()
            .await
            .with_context(|| format!("Failed to call {}", method))?
            .error_for_status()
            .with_context(|| format!("{} returned an HTTP error", method))?
            .json()
            .await
            .with_context(|| format!("Failed to parse {} response", method))?;

        if let Some(mut error) = response.error {
            error.method = method.to_string();
            return Err(error.into());
        }

        response
            .result
            .with_context(|| format!("{} response has neither result nor error", method))
    }

    // ========================================================================
    // Graphs
    // ========================================================================

    /// Ids of graphs matching a host-scoped query
    pub async fn find_graph_ids(&self, query: &GraphQuery) -> Result<Vec<GraphId>> {
        let mut params = json!({
            "output": ["graphid"],
            "hostids": query.hostids,
        });

        if let Some(ref graphids) = query.graphids {
            params["graphids"] = json!(graphids);
        }
        if let Some(ref patterns) = query.name_patterns {
            params["search"] = json!({ "name": patterns });
            params["searchWildcardsEnabled"] = json!(true);
            params["searchByAny"] = json!(true);
        }
        if let Some(limit) = query.limit {
            params["limit"] = json!(limit);
        }

        let rows: Vec<GraphIdRow> = self.call("graph.get", params, true).await?;
        Ok(rows.into_iter().map(|r| r.graphid).collect())
    }

    /// Graphs by id, with names and host names
    pub async fn get_graphs_with_hosts(&self, graphids: &[GraphId]) -> Result<Vec<GraphSummary>> {
        let params = json!({
            "output": ["graphid", "name"],
            "selectHosts": ["name"],
            "graphids": graphids,
        });
        self.call("graph.get", params, true).await
    }

    /// Layout of a single graph
    pub async fn get_graph_layout(&self, graphid: GraphId) -> Result<Option<GraphLayout>> {
        let params = json!({
            "output": ["graphtype", "height"],
            "selectGraphItems": ["yaxisside"],
            "graphids": [graphid],
        });
        let mut layouts: Vec<GraphLayout> = self.call("graph.get", params, true).await?;
        Ok(if layouts.is_empty() {
            None
        } else {
            Some(layouts.swap_remove(0))
        })
    }

    // ========================================================================
    // Hosts and items
    // ========================================================================

    /// Hosts by id
    pub async fn get_hosts(&self, hostids: &[HostId]) -> Result<Vec<Host>> {
        let params = json!({
            "output": ["hostid", "name"],
            "hostids": hostids,
        });
        self.call("host.get", params, true).await
    }

    /// Ids of the items drawn on the given graphs
    pub async fn get_item_ids_by_graphs(&self, graphids: &[GraphId]) -> Result<Vec<ItemId>> {
        let params = json!({
            "output": ["itemid"],
            "graphids": graphids,
        });
        let rows: Vec<ItemIdRow> = self.call("item.get", params, true).await?;
        Ok(rows.into_iter().map(|r| r.itemid).collect())
    }

    // ========================================================================
    // Health
    // ========================================================================

    /// API version string; the call is unauthenticated
    pub async fn api_version(&self) -> Result<String> {
        self.call("apiinfo.version", json!([]), false).await
    }

    /// Check whether the API answers
    pub async fn health_check(&self) -> Result<bool> {
        Ok(self.api_version().await.is_ok())
    }
}
