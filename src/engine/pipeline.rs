// ==========================================
// 生产流程看板 - 聚合流水线
// ==========================================
// 用途: 协调各引擎的执行顺序
// 流程: 工位聚合 → 问题分类 → 流程图 → 全局 KPI → 分析视图
// 红线: 纯函数，无 I/O，无 Result（坏数据在解析层已归零）
// ==========================================

use crate::config::AggregationConfig;
use crate::domain::analytics::ProductionAnalytics;
use crate::domain::record::ProductionRecord;
use crate::domain::snapshot::DashboardData;
use crate::domain::station::StationAggregate;
use crate::engine::{
    AnalyticsEngine, GraphBuilder, IssueClassifier, KpiSummarizer, StationAggregator,
};
use tracing::{debug, info};

pub struct DashboardPipeline {
    aggregator: StationAggregator,
    classifier: IssueClassifier,
    graph_builder: GraphBuilder,
    summarizer: KpiSummarizer,
    analytics: AnalyticsEngine,
}

impl DashboardPipeline {
    pub fn new(config: AggregationConfig) -> Self {
        Self {
            aggregator: StationAggregator::new(&config),
            classifier: IssueClassifier::new(&config),
            graph_builder: GraphBuilder::new(),
            summarizer: KpiSummarizer::new(&config),
            analytics: AnalyticsEngine::new(config.hourly_gross_rate),
        }
    }

    /// 执行一次完整聚合
    ///
    /// # 返回
    /// 同样的记录序列总是得到相同的 DashboardData
    pub fn run(&self, records: &[ProductionRecord]) -> DashboardData {
        // 1. 工位聚合
        let groups = self.aggregator.aggregate(records);
        debug!(stations = groups.len(), "工位聚合完成");

        // 2. 问题分类（需要源记录中的异常描述）
        let issues = self.classifier.classify_all(&groups);

        let stations: Vec<StationAggregate> =
            groups.into_iter().map(|group| group.aggregate).collect();

        // 3. 流程图
        let graph = self.graph_builder.build(&stations);

        // 4. 全局 KPI
        let kpis = self.summarizer.summarize(&stations);

        // 5. 分析视图
        let analytics = self.analytics.compute(&stations);

        info!(
            rows = records.len(),
            stations = stations.len(),
            macro_stages = graph.macro_layer.nodes.len(),
            issues = issues.len(),
            "看板聚合完成"
        );

        DashboardData {
            graph,
            kpis,
            issues,
            analytics,
        }
    }

    /// 由已有 detail 节点重建分析视图（加载导出目录时使用）
    pub fn analytics_for(&self, stations: &[StationAggregate]) -> ProductionAnalytics {
        self.analytics.compute(stations)
    }
}

impl Default for DashboardPipeline {
    fn default() -> Self {
        Self::new(AggregationConfig::default())
    }
}
