// ==========================================
// 生产流程看板 - API 层
// ==========================================
// 职责: 提供业务 API 接口，供 CLI 调用
// ==========================================

pub mod assistant_api;
pub mod config_api;
pub mod dashboard_api;
pub mod error;

// 重导出核心类型
pub use assistant_api::AssistantApi;
pub use config_api::ConfigApi;
pub use dashboard_api::{DashboardApi, SnapshotStore};
pub use error::{ApiError, ApiResult};
