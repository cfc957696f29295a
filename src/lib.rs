// ==========================================
// 生产流程看板 - 核心库
// ==========================================
// 职责: 表格生产记录 → 工位/工序 KPI、两层流程图、问题记录、全局 KPI
// 技术栈: Rust + SQLite（仅配置）
// ==========================================

// 初始化国际化系统
rust_i18n::i18n!("locales", fallback = "fr");

// ==========================================
// 模块声明
// ==========================================

// 领域层 - 实体与类型
pub mod domain;

// 引擎层 - 聚合规则
pub mod engine;

// 导入层 - 外部数据
pub mod importer;

// 配置层 - 系统配置
pub mod config;

// 数据库基础设施（连接初始化/PRAGMA 统一）
pub mod db;

// 日志系统
pub mod logging;

// 国际化
pub mod i18n;

// 分析助手
pub mod assistant;

// API 层 - 业务接口
pub mod api;

// 应用层 - 状态组装
pub mod app;

// ==========================================
// 重导出核心类型
// ==========================================

// 领域类型
pub use domain::types::{IssueKind, Severity};

// 领域实体
pub use domain::{
    DashboardData, FlowGraph, GlobalKpiSummary, ImportSnapshot, IssueRecord, MacroStageAggregate,
    ProductionAnalytics, ProductionRecord, StationAggregate,
};

// 引擎
pub use engine::{parse_time_to_minutes, DashboardPipeline};

// 导入
pub use importer::{DashboardImporter, DashboardImporterImpl, ImportError};

// API
pub use api::{ApiError, AssistantApi, ConfigApi, DashboardApi};

// ==========================================
// 常量定义
// ==========================================

// 系统版本
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

// 系统名称
pub const APP_NAME: &str = "Production Flow Dashboard";
