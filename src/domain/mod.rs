// ==========================================
// 生产流程看板 - 领域模型层
// ==========================================
// 职责: 定义领域实体、类型
// 红线: 不含 I/O，不含聚合逻辑
// ==========================================

pub mod analytics;
pub mod graph;
pub mod issue;
pub mod kpi;
pub mod record;
pub mod snapshot;
pub mod station;
pub mod types;

// 重导出核心类型
pub use analytics::{
    BudgetSummary, CycleComparison, ProductionAnalytics, SeverityCount, StageBreakdown,
    StageSaving, StationSaving,
};
pub use graph::{FlowGraph, GraphEdge, GraphLayer};
pub use issue::IssueRecord;
pub use kpi::{GlobalKpiSummary, MacroBottleneck};
pub use record::ProductionRecord;
pub use snapshot::{DashboardData, ImportSnapshot};
pub use station::{MacroStageAggregate, MacroStageKpi, StationAggregate, StationKpi};
pub use types::{IssueKind, Severity};
