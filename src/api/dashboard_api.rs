// ==========================================
// 生产流程看板 - 看板 API
// ==========================================
// 职责: 导入文件、查询当前快照、导出/加载 JSON 目录
// 说明: 每次成功导入整体替换快照；导入失败保留上一份
// ==========================================

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Arc, RwLock};

use chrono::Utc;
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::{info, warn};
use uuid::Uuid;

use crate::api::error::{ApiError, ApiResult};
use crate::config::{AggregationConfig, ConfigManager};
use crate::domain::{
    DashboardData, FlowGraph, GlobalKpiSummary, ImportSnapshot, IssueRecord, ProductionAnalytics,
};
use crate::engine::DashboardPipeline;
use crate::importer::DashboardImporter;

// 导出目录中的文件名（与前端 mock 目录一致）
pub const GRAPH_FILE: &str = "graph.json";
pub const KPIS_FILE: &str = "kpis.json";
pub const ISSUES_FILE: &str = "issues.json";
pub const ANALYTICS_FILE: &str = "analytics.json";

// ==========================================
// SnapshotStore - 当前快照
// ==========================================
#[derive(Default)]
pub struct SnapshotStore {
    current: RwLock<Option<ImportSnapshot>>,
}

impl SnapshotStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self) -> ApiResult<Option<ImportSnapshot>> {
        let guard = self
            .current
            .read()
            .map_err(|e| ApiError::InternalError(format!("快照锁获取失败: {}", e)))?;
        Ok(guard.clone())
    }

    pub fn replace(&self, snapshot: ImportSnapshot) -> ApiResult<()> {
        let mut guard = self
            .current
            .write()
            .map_err(|e| ApiError::InternalError(format!("快照锁获取失败: {}", e)))?;
        *guard = Some(snapshot);
        Ok(())
    }

    /// 读取当前看板数据；无快照时返回 NotFound
    pub fn with_dashboard<T>(&self, f: impl FnOnce(&DashboardData) -> T) -> ApiResult<T> {
        let guard = self
            .current
            .read()
            .map_err(|e| ApiError::InternalError(format!("快照锁获取失败: {}", e)))?;
        guard
            .as_ref()
            .map(|snapshot| f(&snapshot.dashboard))
            .ok_or_else(|| ApiError::NotFound("尚未导入生产数据".to_string()))
    }
}

// ==========================================
// DashboardApi - 看板 API
// ==========================================
pub struct DashboardApi {
    importer: Arc<dyn DashboardImporter>,
    config_manager: Arc<ConfigManager>,
    store: Arc<SnapshotStore>,
}

impl DashboardApi {
    pub fn new(
        importer: Arc<dyn DashboardImporter>,
        config_manager: Arc<ConfigManager>,
        store: Arc<SnapshotStore>,
    ) -> Self {
        Self {
            importer,
            config_manager,
            store,
        }
    }

    /// 导入表格文件并替换当前快照
    pub async fn import_file(&self, file_path: &Path) -> ApiResult<ImportSnapshot> {
        let snapshot = self.importer.import_file(file_path).await.map_err(|e| {
            warn!(error = %e, "导入失败，保留上一份快照");
            ApiError::from(e)
        })?;

        self.store.replace(snapshot.clone())?;
        Ok(snapshot)
    }

    pub fn current_snapshot(&self) -> ApiResult<ImportSnapshot> {
        self.store
            .get()?
            .ok_or_else(|| ApiError::NotFound("尚未导入生产数据".to_string()))
    }

    pub fn get_graph(&self) -> ApiResult<FlowGraph> {
        self.store.with_dashboard(|d| d.graph.clone())
    }

    pub fn get_kpis(&self) -> ApiResult<GlobalKpiSummary> {
        self.store.with_dashboard(|d| d.kpis.clone())
    }

    pub fn get_issues(&self) -> ApiResult<Vec<IssueRecord>> {
        self.store.with_dashboard(|d| d.issues.clone())
    }

    pub fn get_analytics(&self) -> ApiResult<ProductionAnalytics> {
        self.store.with_dashboard(|d| d.analytics.clone())
    }

    /// 导出当前快照到目录
    ///
    /// # 返回
    /// 写入的文件路径（graph / kpis / issues / analytics）
    pub fn export_snapshot(&self, dir: &Path, pretty: bool) -> ApiResult<Vec<PathBuf>> {
        let snapshot = self.current_snapshot()?;
        let dashboard = &snapshot.dashboard;
        fs::create_dir_all(dir)?;

        let written = vec![
            write_json(&dir.join(GRAPH_FILE), &dashboard.graph, pretty)?,
            write_json(&dir.join(KPIS_FILE), &dashboard.kpis, pretty)?,
            write_json(&dir.join(ISSUES_FILE), &dashboard.issues, pretty)?,
            write_json(&dir.join(ANALYTICS_FILE), &dashboard.analytics, pretty)?,
        ];

        info!(dir = %dir.display(), batch_id = %snapshot.batch_id, "快照已导出");
        Ok(written)
    }

    /// 从 JSON 目录加载快照（分析视图由 detail 节点重新计算）
    pub async fn load_snapshot_dir(&self, dir: &Path) -> ApiResult<ImportSnapshot> {
        let graph: FlowGraph = read_json(&dir.join(GRAPH_FILE))?;
        let kpis: GlobalKpiSummary = read_json(&dir.join(KPIS_FILE))?;
        let issues: Vec<IssueRecord> = read_json(&dir.join(ISSUES_FILE))?;

        let config = match AggregationConfig::load(self.config_manager.as_ref()).await {
            Ok(config) => config,
            Err(e) => {
                warn!(error = %e, "聚合参数读取失败，使用缺省值");
                AggregationConfig::default()
            }
        };
        let analytics = DashboardPipeline::new(config).analytics_for(&graph.detail.nodes);
        let row_count = graph.detail.nodes.iter().map(|n| n.kpi.piece_count).sum();

        let snapshot = ImportSnapshot {
            batch_id: Uuid::new_v4().to_string(),
            source_file: dir.display().to_string(),
            imported_at: Utc::now(),
            row_count,
            dashboard: DashboardData {
                graph,
                kpis,
                issues,
                analytics,
            },
        };

        self.store.replace(snapshot.clone())?;
        info!(dir = %dir.display(), "已从目录加载快照");
        Ok(snapshot)
    }
}

fn write_json<T: Serialize>(path: &Path, value: &T, pretty: bool) -> ApiResult<PathBuf> {
    let json = if pretty {
        serde_json::to_string_pretty(value)?
    } else {
        serde_json::to_string(value)?
    };
    fs::write(path, json)?;
    Ok(path.to_path_buf())
}

fn read_json<T: DeserializeOwned>(path: &Path) -> ApiResult<T> {
    if !path.exists() {
        return Err(ApiError::NotFound(format!("文件不存在: {}", path.display())));
    }
    let content = fs::read_to_string(path)?;
    Ok(serde_json::from_str(&content)?)
}
