//! Filter state persistence
//!
//! Reset clears the stored filter, set stores the submitted one; the
//! effective filter then prefers request values over stored ones.

use super::models::{ChartsViewRequest, FilterState, SearchType};
use crate::profile::UserProfile;
use anyhow::Result;
use tracing::info;

pub const SEARCH_TYPE_KEY: &str = "web.graphs.filter.search_type";
pub const GRAPHIDS_KEY: &str = "web.graphs.filter.graphids";
pub const GRAPH_PATTERNS_KEY: &str = "web.graphs.filter.graph_patterns";
pub const HOSTIDS_KEY: &str = "web.graphs.filter.hostids";
pub const ACTIVE_TAB_KEY: &str = "web.graphs.filter.active";

/// What a request asks to do with the stored filter
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterAction {
    Reset,
    Set,
    Keep,
}

impl FilterAction {
    /// Reset wins when both flags are present
    pub fn from_request(request: &ChartsViewRequest) -> Self {
        if request.filter_rst {
            FilterAction::Reset
        } else if request.filter_set {
            FilterAction::Set
        } else {
            FilterAction::Keep
        }
    }
}

/// Clear or store the filter as requested
pub async fn apply_action(
    profile: &UserProfile<'_>,
    request: &ChartsViewRequest,
) -> Result<FilterAction> {
    let action = FilterAction::from_request(request);

    match action {
        FilterAction::Reset => {
            info!(user_id = profile.user_id(), "Resetting graph filter");
            for key in [SEARCH_TYPE_KEY, GRAPHIDS_KEY, GRAPH_PATTERNS_KEY, HOSTIDS_KEY] {
                profile.delete_idx(key).await?;
            }
        }
        FilterAction::Set => {
            info!(user_id = profile.user_id(), "Storing graph filter");
            let search_type = request.filter_search_type.unwrap_or_default();
            profile.update_int(SEARCH_TYPE_KEY, search_type.code()).await?;
            profile
                .update_ids(GRAPHIDS_KEY, request.filter_graphids.as_deref().unwrap_or_default())
                .await?;
            profile
                .update_strs(
                    GRAPH_PATTERNS_KEY,
                    request.filter_graph_patterns.as_deref().unwrap_or_default(),
                )
                .await?;
            profile
                .update_ids(HOSTIDS_KEY, request.filter_hostids.as_deref().unwrap_or_default())
                .await?;
        }
        FilterAction::Keep => {}
    }

    Ok(action)
}

/// Effective filter: each field from the request if present, else from the profile
pub async fn load_filter(
    profile: &UserProfile<'_>,
    request: &ChartsViewRequest,
) -> Result<FilterState> {
    let search_type = match request.filter_search_type {
        Some(search_type) => search_type,
        None => SearchType::from_code(
            profile
                .get_int(SEARCH_TYPE_KEY, SearchType::Strict.code())
                .await?,
        ),
    };

    let graphids = match request.filter_graphids {
        Some(ref ids) => ids.clone(),
        None => profile.get_ids(GRAPHIDS_KEY).await?,
    };

    let graph_patterns = match request.filter_graph_patterns {
        Some(ref patterns) => patterns.clone(),
        None => profile.get_strs(GRAPH_PATTERNS_KEY).await?,
    };

    let hostids = match request.filter_hostids {
        Some(ref ids) => ids.clone(),
        None => profile.get_ids(HOSTIDS_KEY).await?,
    };

    Ok(FilterState {
        search_type,
        hostids,
        graphids,
        graph_patterns,
    })
}
