// ==========================================
// 生产流程看板 - 看板导入器
// ==========================================
// 流程:
// 1. 文件读取与解析（阻塞线程池）
// 2. 字段映射
// 3. 加载聚合参数
// 4. 聚合流水线
// 5. 生成导入快照（批次 id / 导入时间）
// ==========================================

use crate::config::{AggregationConfig, DashboardConfigReader};
use crate::domain::record::ProductionRecord;
use crate::domain::snapshot::ImportSnapshot;
use crate::engine::DashboardPipeline;
use crate::importer::error::ImportResult;
use crate::importer::field_mapper::RecordMapper;
use crate::importer::file_parser::UniversalFileParser;
use async_trait::async_trait;
use chrono::Utc;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, error, info, instrument, warn};
use uuid::Uuid;

// ==========================================
// DashboardImporter Trait
// ==========================================
#[async_trait]
pub trait DashboardImporter: Send + Sync {
    /// 从表格文件导入并聚合
    ///
    /// # 参数
    /// - file_path: .csv / .xlsx / .xls / .ods
    ///
    /// # 返回
    /// - Ok(ImportSnapshot): 全新快照
    /// - Err: 文件不存在、格式不支持、解析失败
    async fn import_file(&self, file_path: &Path) -> ImportResult<ImportSnapshot>;

    /// 对已映射的记录执行聚合（不经过文件）
    async fn import_records(
        &self,
        source: &str,
        records: Vec<ProductionRecord>,
    ) -> ImportResult<ImportSnapshot>;
}

// ==========================================
// DashboardImporterImpl
// ==========================================
pub struct DashboardImporterImpl<C>
where
    C: DashboardConfigReader + ?Sized,
{
    config: Arc<C>,
    mapper: RecordMapper,
}

impl<C> DashboardImporterImpl<C>
where
    C: DashboardConfigReader + ?Sized,
{
    pub fn new(config: Arc<C>) -> Self {
        Self {
            config,
            mapper: RecordMapper,
        }
    }

    /// 读取聚合参数；读取失败时退回缺省值
    async fn load_aggregation_config(&self) -> AggregationConfig {
        match AggregationConfig::load(self.config.as_ref()).await {
            Ok(config) => config,
            Err(e) => {
                warn!(error = %e, "聚合参数读取失败，使用缺省值");
                AggregationConfig::default()
            }
        }
    }

    fn build_snapshot(
        &self,
        batch_id: String,
        source: &str,
        records: &[ProductionRecord],
        config: AggregationConfig,
    ) -> ImportSnapshot {
        let dashboard = DashboardPipeline::new(config).run(records);

        ImportSnapshot {
            batch_id,
            source_file: source.to_string(),
            imported_at: Utc::now(),
            row_count: records.len(),
            dashboard,
        }
    }
}

#[async_trait]
impl<C> DashboardImporter for DashboardImporterImpl<C>
where
    C: DashboardConfigReader + ?Sized,
{
    #[instrument(skip(self, file_path), fields(batch_id))]
    async fn import_file(&self, file_path: &Path) -> ImportResult<ImportSnapshot> {
        let start_time = Instant::now();
        let batch_id = Uuid::new_v4().to_string();
        tracing::Span::current().record("batch_id", batch_id.as_str());

        let source = file_path.display().to_string();
        info!(batch_id = %batch_id, file_path = %source, "开始导入生产数据");

        // === 步骤 1: 解析文件 ===
        debug!("步骤 1: 解析文件");
        let owned_path: PathBuf = file_path.to_path_buf();
        let raw_rows = tokio::task::spawn_blocking(move || UniversalFileParser.parse(owned_path))
            .await?
            .map_err(|e| {
                error!(error = %e, "文件解析失败");
                e
            })?;
        info!(total_rows = raw_rows.len(), "文件解析完成");

        // === 步骤 2: 字段映射 ===
        debug!("步骤 2: 字段映射");
        let records = self.mapper.map_all(&raw_rows);

        // === 步骤 3: 聚合参数 ===
        let config = self.load_aggregation_config().await;

        // === 步骤 4: 聚合 ===
        debug!("步骤 4: 聚合流水线");
        let snapshot = self.build_snapshot(batch_id, &source, &records, config);

        info!(
            batch_id = %snapshot.batch_id,
            rows = snapshot.row_count,
            stations = snapshot.dashboard.graph.detail.nodes.len(),
            issues = snapshot.dashboard.issues.len(),
            elapsed_ms = start_time.elapsed().as_millis() as u64,
            "导入完成"
        );

        Ok(snapshot)
    }

    async fn import_records(
        &self,
        source: &str,
        records: Vec<ProductionRecord>,
    ) -> ImportResult<ImportSnapshot> {
        let batch_id = Uuid::new_v4().to_string();
        let config = self.load_aggregation_config().await;
        Ok(self.build_snapshot(batch_id, source, &records, config))
    }
}
