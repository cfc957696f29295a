// ==========================================
// 生产流程看板 - 工位 / 工序聚合实体
// ==========================================
// 依据: 看板前端 graph.json 契约（detail / macro 节点）
// ==========================================

use crate::domain::types::Severity;
use serde::{Deserialize, Serialize};

// ==========================================
// StationKpi - 工位节拍指标
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StationKpi {
    /// 计划节拍均值（分钟）
    #[serde(rename = "cycle_prev")]
    pub planned_avg_minutes: f64,

    /// 实际节拍均值（分钟）
    #[serde(rename = "cycle_real")]
    pub actual_avg_minutes: f64,

    /// 偏差 = 实际 - 计划（分钟）
    #[serde(rename = "delta_cycle")]
    pub delta_minutes: f64,

    #[serde(rename = "criticite")]
    pub severity: Severity,

    /// 映射到该工位的行数
    #[serde(rename = "nb_pieces")]
    pub piece_count: usize,
}

// ==========================================
// StationAggregate - 工位聚合（detail 节点）
// ==========================================
// id: P1, P2, ... 仅在单次聚合内稳定
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StationAggregate {
    pub id: String,
    pub label: String,

    /// 所属工序（取该工位首行）
    #[serde(rename = "macro")]
    pub macro_stage: String,

    pub kpi: StationKpi,
}

// ==========================================
// MacroStageKpi - 工序指标
// ==========================================
// 注意: 全局均值广播到每个工序，并非按工序汇总
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MacroStageKpi {
    #[serde(rename = "leadtime")]
    pub leadtime_minutes: f64,

    #[serde(rename = "delta")]
    pub delta_minutes: f64,
}

// ==========================================
// MacroStageAggregate - 工序聚合（macro 节点）
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MacroStageAggregate {
    pub id: String,
    pub label: String,
    pub kpi: MacroStageKpi,
}
