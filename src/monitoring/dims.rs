//! Chart dimension calculation
//!
//! Derives the paddings and height the chart renderer needs from a graph's
//! layout: the y-axis sides in use decide the left/right bounds.

use super::models::{GraphDims, GraphLayout, GraphType};

/// Top padding reserved for the chart header
pub const HEADER_PADDING_TOP: i32 = 36;
/// Bound on a side that carries a y-axis
pub const AXIS_BOUND: i32 = 60;
/// Right bound when only the left axis is drawn
pub const RIGHT_BOUND_NO_AXIS: i32 = 20;
/// Left bound when only the right axis is drawn
pub const LEFT_BOUND_NO_AXIS: i32 = 10;
/// Height used when a graph has no stored layout
pub const DEFAULT_GRAPH_HEIGHT: i32 = 200;

const YAXIS_LEFT: i32 = 0;
const YAXIS_BOTH: i32 = 2;

/// Compute chart dimensions. Unknown graphs and graphs without items get the
/// single-left-axis bounds.
pub fn graph_dims(layout: Option<&GraphLayout>) -> GraphDims {
    let Some(layout) = layout.filter(|l| !l.gitems.is_empty()) else {
        return GraphDims {
            shift_y_top: HEADER_PADDING_TOP,
            shift_x_left: AXIS_BOUND,
            shift_x_right: RIGHT_BOUND_NO_AXIS,
            graph_height: layout.map_or(DEFAULT_GRAPH_HEIGHT, |l| l.height),
            graph_type: layout.map_or(GraphType::Normal, |l| GraphType::from_code(l.graphtype)),
            yaxis: None,
        };
    };

    let min_side = layout.gitems.iter().map(|i| i.yaxisside).min().unwrap_or(YAXIS_LEFT);
    let max_side = layout.gitems.iter().map(|i| i.yaxisside).max().unwrap_or(YAXIS_LEFT);
    let yaxis = if min_side == max_side { max_side } else { YAXIS_BOTH };

    let (shift_x_left, shift_x_right) = match yaxis {
        YAXIS_BOTH => (AXIS_BOUND, AXIS_BOUND),
        YAXIS_LEFT => (AXIS_BOUND, RIGHT_BOUND_NO_AXIS),
        _ => (LEFT_BOUND_NO_AXIS, AXIS_BOUND),
    };

    GraphDims {
        shift_y_top: HEADER_PADDING_TOP,
        shift_x_left,
        shift_x_right,
        graph_height: layout.height,
        graph_type: GraphType::from_code(layout.graphtype),
        yaxis: Some(yaxis),
    }
}
