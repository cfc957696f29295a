// ==========================================
// 生产流程看板 - 流程图构建器
// ==========================================
// 职责: 工位聚合 → detail 层；按工序分组 → macro 层
// 边: 位置链（第 i 个连第 i+1 个），不表达真实工位流转
// ==========================================

use crate::domain::graph::{FlowGraph, GraphEdge, GraphLayer};
use crate::domain::station::{MacroStageAggregate, MacroStageKpi, StationAggregate};

pub struct GraphBuilder;

impl GraphBuilder {
    pub fn new() -> Self {
        Self
    }

    /// 构建两层流程图
    ///
    /// # macro 节点 KPI
    /// - leadtime = Σ(实际均值 × 件数) / 工位数
    /// - delta = |Σ实际 - Σ计划| / 工位数
    /// - 全局值广播到每个工序（与现有前端口径一致）
    pub fn build(&self, stations: &[StationAggregate]) -> FlowGraph {
        let detail = GraphLayer {
            edges: chain_edges(stations.iter().map(|s| s.id.as_str())),
            nodes: stations.to_vec(),
        };

        let macro_nodes = self.build_macro_nodes(stations);
        let macro_layer = GraphLayer {
            edges: chain_edges(macro_nodes.iter().map(|m| m.id.as_str())),
            nodes: macro_nodes,
        };

        FlowGraph {
            macro_layer,
            detail,
        }
    }

    fn build_macro_nodes(&self, stations: &[StationAggregate]) -> Vec<MacroStageAggregate> {
        if stations.is_empty() {
            return Vec::new();
        }

        let (planned_total, actual_total) = weighted_totals(stations);
        let station_count = stations.len() as f64;
        let kpi = MacroStageKpi {
            leadtime_minutes: actual_total / station_count,
            delta_minutes: (actual_total - planned_total).abs() / station_count,
        };

        distinct_stages(stations)
            .into_iter()
            .enumerate()
            .map(|(idx, label)| MacroStageAggregate {
                id: format!("M{}", idx + 1),
                label: label.to_string(),
                kpi: kpi.clone(),
            })
            .collect()
    }
}

impl Default for GraphBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// 相邻元素连边
fn chain_edges<'a>(ids: impl Iterator<Item = &'a str>) -> Vec<GraphEdge> {
    let ids: Vec<&str> = ids.collect();
    ids.windows(2)
        .map(|pair| GraphEdge::new(pair[0], pair[1]))
        .collect()
}

/// 工序名称（首次出现顺序去重）
pub(crate) fn distinct_stages(stations: &[StationAggregate]) -> Vec<&str> {
    let mut stages: Vec<&str> = Vec::new();
    for station in stations {
        if !stages.contains(&station.macro_stage.as_str()) {
            stages.push(station.macro_stage.as_str());
        }
    }
    stages
}

/// 按件数加权的 (计划总时长, 实际总时长)
pub(crate) fn weighted_totals(stations: &[StationAggregate]) -> (f64, f64) {
    stations.iter().fold((0.0, 0.0), |(planned, actual), s| {
        let pieces = s.kpi.piece_count as f64;
        (
            planned + s.kpi.planned_avg_minutes * pieces,
            actual + s.kpi.actual_avg_minutes * pieces,
        )
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::station::StationKpi;
    use crate::domain::types::Severity;

    fn station(id: &str, stage: &str, planned: f64, actual: f64, pieces: usize) -> StationAggregate {
        StationAggregate {
            id: id.to_string(),
            label: format!("Poste {}", id),
            macro_stage: stage.to_string(),
            kpi: StationKpi {
                planned_avg_minutes: planned,
                actual_avg_minutes: actual,
                delta_minutes: actual - planned,
                severity: Severity::Minor,
                piece_count: pieces,
            },
        }
    }

    #[test]
    fn test_detail_edges_are_positional_chain() {
        let stations = vec![
            station("P1", "S1", 1.0, 1.0, 1),
            station("P2", "S2", 1.0, 1.0, 1),
            station("P3", "S1", 1.0, 1.0, 1),
        ];

        let graph = GraphBuilder::new().build(&stations);

        assert_eq!(
            graph.detail.edges,
            vec![GraphEdge::new("P1", "P2"), GraphEdge::new("P2", "P3")]
        );
        assert_eq!(graph.macro_layer.nodes.len(), 2);
        assert_eq!(graph.macro_layer.nodes[0].label, "S1");
        assert_eq!(graph.macro_layer.nodes[1].label, "S2");
        assert_eq!(graph.macro_layer.edges, vec![GraphEdge::new("M1", "M2")]);
    }

    #[test]
    fn test_macro_kpi_is_global_broadcast() {
        let stations = vec![
            station("P1", "S1", 10.0, 16.0, 2), // 计划 20 / 实际 32
            station("P2", "S2", 5.0, 4.0, 2),   // 计划 10 / 实际 8
        ];

        let graph = GraphBuilder::new().build(&stations);

        for node in &graph.macro_layer.nodes {
            assert_eq!(node.kpi.leadtime_minutes, 20.0); // 40 / 2
            assert_eq!(node.kpi.delta_minutes, 5.0); // |40 - 30| / 2
        }
    }

    #[test]
    fn test_single_and_empty() {
        let graph = GraphBuilder::new().build(&[station("P1", "S1", 1.0, 2.0, 1)]);
        assert!(graph.detail.edges.is_empty());
        assert!(graph.macro_layer.edges.is_empty());
        assert_eq!(graph.macro_layer.nodes[0].id, "M1");

        let empty = GraphBuilder::new().build(&[]);
        assert!(empty.detail.nodes.is_empty());
        assert!(empty.macro_layer.nodes.is_empty());
    }
}
