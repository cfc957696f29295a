// ==========================================
// 生产流程看板 - 引擎层
// ==========================================
// 职责: 记录 → 工位 KPI → 问题 / 流程图 / 全局 KPI / 分析视图
// 红线: 引擎不做 I/O，不返回 Result
// ==========================================

pub mod analytics;
pub mod graph_builder;
pub mod issue_classifier;
pub mod kpi_summarizer;
pub mod pipeline;
pub mod station_aggregator;
pub mod time_parser;

// 重导出核心引擎
pub use analytics::AnalyticsEngine;
pub use graph_builder::GraphBuilder;
pub use issue_classifier::IssueClassifier;
pub use kpi_summarizer::{round_half_up, KpiSummarizer};
pub use pipeline::DashboardPipeline;
pub use station_aggregator::{StationAggregator, StationGroup};
pub use time_parser::parse_time_to_minutes;
