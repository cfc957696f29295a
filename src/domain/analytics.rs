// ==========================================
// 生产流程看板 - 分析视图数据
// ==========================================
// 职责: 计划/实际对比、工序分解、严重度分布、节省预算
// 来源: detail 节点（可由导出的 graph.json 重新计算）
// ==========================================

use crate::domain::types::Severity;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CycleComparison {
    pub name: String,
    pub macro_stage: String,
    pub planned_minutes: f64,
    pub actual_minutes: f64,
    pub delta_minutes: f64,
}

/// 按工序求和（区别于 macro 节点上广播的全局均值）
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StageBreakdown {
    pub name: String,
    pub leadtime_minutes: f64,
    pub delta_minutes: f64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeverityCount {
    pub severity: Severity,
    pub count: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StationSaving {
    pub name: String,
    pub macro_stage: String,
    pub planned_minutes: f64,
    pub actual_minutes: f64,
    pub saved_minutes: f64,
    pub saved_euros: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StageSaving {
    pub name: String,
    pub saved_minutes: f64,
    pub saved_euros: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BudgetSummary {
    pub hourly_gross_rate: f64,
    pub total_saved_minutes: f64,
    pub total_saved_euros: f64,
    pub avg_saved_euros: f64,
    pub max_saved_euros: f64,
    pub stations: Vec<StationSaving>,
    pub stages: Vec<StageSaving>,
    pub top_stations: Vec<StationSaving>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProductionAnalytics {
    pub cycle_comparison: Vec<CycleComparison>,
    pub stage_breakdown: Vec<StageBreakdown>,
    pub severity_distribution: Vec<SeverityCount>,
    pub budget: BudgetSummary,
}
