// ==========================================
// 生产流程看板 - 全局 KPI 汇总
// ==========================================
// 依据: 看板前端 kpis.json 契约
// 分钟数按四舍五入（.5 向上）取整
// ==========================================

use serde::{Deserialize, Serialize};

/// 按工序汇总的偏差排名项
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MacroBottleneck {
    #[serde(rename = "macro_step")]
    pub macro_stage: String,

    /// 该工序下各工位偏差之和（取整）
    #[serde(rename = "delta_leadtime_total_min")]
    pub delta_total_minutes: i64,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GlobalKpiSummary {
    /// Σ(计划均值 × 件数)
    #[serde(rename = "leadtime_prev_global_min")]
    pub leadtime_planned_minutes: i64,

    /// Σ(实际均值 × 件数)
    #[serde(rename = "leadtime_real_global_min")]
    pub leadtime_actual_minutes: i64,

    #[serde(rename = "delta_leadtime_global_min")]
    pub delta_leadtime_minutes: i64,

    // WIP 指数: 配置常量占位，不由输入数据推导
    pub wip_index_baseline: i64,
    pub wip_index_scenario: i64,
    pub delta_wip_index: i64,

    #[serde(rename = "top_macro_bottlenecks")]
    pub top_macro_bottlenecks: Vec<MacroBottleneck>,
}
