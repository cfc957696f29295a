// ==========================================
// 生产流程看板 - 流程图
// ==========================================
// 两层独立的节点/边集合: macro（工序） / detail（工位）
// 边按迭代顺序串成链，不是一般 DAG
// 布局坐标由展示层负责，这里不产生
// ==========================================

use crate::domain::station::{MacroStageAggregate, StationAggregate};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GraphEdge {
    pub source: String,
    pub target: String,
}

impl GraphEdge {
    pub fn new(source: &str, target: &str) -> Self {
        Self {
            source: source.to_string(),
            target: target.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GraphLayer<N> {
    pub nodes: Vec<N>,
    pub edges: Vec<GraphEdge>,
}

impl<N> Default for GraphLayer<N> {
    fn default() -> Self {
        Self {
            nodes: Vec::new(),
            edges: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FlowGraph {
    #[serde(rename = "macro")]
    pub macro_layer: GraphLayer<MacroStageAggregate>,
    pub detail: GraphLayer<StationAggregate>,
}
