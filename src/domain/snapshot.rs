// ==========================================
// 生产流程看板 - 导入快照
// ==========================================
// 每次文件导入生成全新快照，整体替换上一份；无增量更新、无持久化
// ==========================================

use crate::domain::analytics::ProductionAnalytics;
use crate::domain::graph::FlowGraph;
use crate::domain::issue::IssueRecord;
use crate::domain::kpi::GlobalKpiSummary;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// ==========================================
// DashboardData - 看板数据（纯聚合结果）
// ==========================================
// 同样输入 → 结构完全相同（确定性）
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DashboardData {
    pub graph: FlowGraph,
    pub kpis: GlobalKpiSummary,
    pub issues: Vec<IssueRecord>,
    pub analytics: ProductionAnalytics,
}

// ==========================================
// ImportSnapshot - 导入快照（含批次元信息）
// ==========================================
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImportSnapshot {
    pub batch_id: String,
    pub source_file: String,
    pub imported_at: DateTime<Utc>,
    pub row_count: usize,
    pub dashboard: DashboardData,
}
