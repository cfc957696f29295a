// ==========================================
// 生产流程看板 - 应用层
// ==========================================
// 职责: 组装配置、快照与 API 实例
// ==========================================

pub mod state;

// 重导出
pub use state::{get_default_db_path, AppState};
