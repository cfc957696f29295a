// ==========================================
// 生产流程看板 - 应用状态
// ==========================================
// 职责: 管理应用级别的共享状态和API实例
// ==========================================

use std::path::PathBuf;
use std::sync::Arc;

use crate::api::{AssistantApi, ConfigApi, DashboardApi, SnapshotStore};
use crate::config::config_manager::defaults;
use crate::config::{config_keys, ConfigManager};
use crate::importer::DashboardImporterImpl;

/// 数据库路径环境变量
pub const DB_PATH_ENV: &str = "PRODUCTION_FLOW_DB_PATH";

/// 应用状态
///
/// 包含所有API实例和共享资源
pub struct AppState {
    /// 数据库路径
    pub db_path: String,

    /// 配置管理器（聚合阈值、助手设置）
    pub config_manager: Arc<ConfigManager>,

    /// 当前看板快照
    pub snapshot_store: Arc<SnapshotStore>,

    /// 看板API
    pub dashboard_api: Arc<DashboardApi>,

    /// 配置管理API
    pub config_api: Arc<ConfigApi>,

    /// 分析助手API
    pub assistant_api: Arc<AssistantApi>,
}

impl AppState {
    /// 创建新的AppState实例
    ///
    /// # 参数
    /// - db_path: 数据库文件路径（":memory:" 为内存库）
    ///
    /// # 返回
    /// - Ok(AppState): 应用状态实例
    /// - Err(String): 初始化错误
    pub fn new(db_path: String) -> Result<Self, String> {
        tracing::info!("初始化AppState，数据库路径: {}", db_path);

        let config_manager = Arc::new(
            ConfigManager::new(&db_path).map_err(|e| format!("无法创建ConfigManager: {}", e))?,
        );

        let locale = config_manager
            .get_config_value(config_keys::LOCALE)
            .map_err(|e| format!("无法读取语言配置: {}", e))?
            .unwrap_or_else(|| defaults::LOCALE.to_string());

        let snapshot_store = Arc::new(SnapshotStore::new());
        let importer = Arc::new(DashboardImporterImpl::new(config_manager.clone()));

        let dashboard_api = Arc::new(DashboardApi::new(
            importer,
            config_manager.clone(),
            snapshot_store.clone(),
        ));
        let config_api = Arc::new(ConfigApi::new(config_manager.clone()));
        let assistant_api = Arc::new(AssistantApi::new(
            config_manager.clone(),
            snapshot_store.clone(),
            &locale,
        ));

        tracing::info!("AppState初始化完成");

        Ok(Self {
            db_path,
            config_manager,
            snapshot_store,
            dashboard_api,
            config_api,
            assistant_api,
        })
    }
}

/// 默认数据库路径
///
/// # 顺序
/// 1. 环境变量 PRODUCTION_FLOW_DB_PATH
/// 2. 用户数据目录 production-flow/production_flow.db
/// 3. 当前目录 ./production_flow.db
pub fn get_default_db_path() -> String {
    if let Ok(path) = std::env::var(DB_PATH_ENV) {
        let trimmed = path.trim();
        if !trimmed.is_empty() {
            return trimmed.to_string();
        }
    }

    let mut path = PathBuf::from("./production_flow.db");

    if let Some(data_dir) = dirs::data_dir() {
        let dir = data_dir.join("production-flow");
        // 目录创建失败时退回当前目录
        if std::fs::create_dir_all(&dir).is_ok() {
            path = dir.join("production_flow.db");
        }
    }

    path.to_string_lossy().to_string()
}
