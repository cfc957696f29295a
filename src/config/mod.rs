// ==========================================
// 生产流程看板 - 配置层
// ==========================================
// 职责: 阈值 / 常量 / 助手参数的读取与覆写
// 存储: config_kv 表
// ==========================================

pub mod aggregation_config;
pub mod config_manager;
pub mod dashboard_config_trait;

// 重导出核心配置类型
pub use aggregation_config::AggregationConfig;
pub use config_manager::{config_keys, ConfigEntry, ConfigManager};
pub use dashboard_config_trait::DashboardConfigReader;
