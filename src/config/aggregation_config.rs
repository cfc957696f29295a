// ==========================================
// 生产流程看板 - 聚合参数
// ==========================================
// 职责: 聚合管道所需的阈值与常量（值对象）
// 来源: config_kv 表，缺省值见 Default
// ==========================================

use crate::config::dashboard_config_trait::DashboardConfigReader;
use serde::{Deserialize, Serialize};
use std::error::Error;

/// 主要偏差阈值（分钟）
pub const DEFAULT_MAJOR_DELTA_THRESHOLD_MIN: f64 = 5.0;
/// 严重偏差阈值（分钟）
pub const DEFAULT_CRITICAL_DELTA_THRESHOLD_MIN: f64 = 10.0;
/// 单件成本
pub const DEFAULT_PIECE_UNIT_COST: f64 = 50_000.0;
/// WIP 指数基线（占位常量）
pub const DEFAULT_WIP_INDEX_BASELINE: i64 = 18_400;
/// WIP 指数情景（占位常量）
pub const DEFAULT_WIP_INDEX_SCENARIO: i64 = 15_200;
/// 瓶颈工序排名数量
pub const DEFAULT_TOP_BOTTLENECK_COUNT: usize = 3;
/// 小时毛工资（欧元）
pub const DEFAULT_HOURLY_GROSS_RATE: f64 = 38.53;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AggregationConfig {
    pub major_delta_threshold_min: f64,
    pub critical_delta_threshold_min: f64,
    pub piece_unit_cost: f64,
    pub wip_index_baseline: i64,
    pub wip_index_scenario: i64,
    pub top_bottleneck_count: usize,
    pub hourly_gross_rate: f64,
}

impl Default for AggregationConfig {
    fn default() -> Self {
        Self {
            major_delta_threshold_min: DEFAULT_MAJOR_DELTA_THRESHOLD_MIN,
            critical_delta_threshold_min: DEFAULT_CRITICAL_DELTA_THRESHOLD_MIN,
            piece_unit_cost: DEFAULT_PIECE_UNIT_COST,
            wip_index_baseline: DEFAULT_WIP_INDEX_BASELINE,
            wip_index_scenario: DEFAULT_WIP_INDEX_SCENARIO,
            top_bottleneck_count: DEFAULT_TOP_BOTTLENECK_COUNT,
            hourly_gross_rate: DEFAULT_HOURLY_GROSS_RATE,
        }
    }
}

impl AggregationConfig {
    /// 从配置读取器加载
    pub async fn load<C>(reader: &C) -> Result<Self, Box<dyn Error>>
    where
        C: DashboardConfigReader + ?Sized,
    {
        let mut major_delta_threshold_min = reader.get_major_delta_threshold().await?;
        let mut critical_delta_threshold_min = reader.get_critical_delta_threshold().await?;
        if critical_delta_threshold_min < major_delta_threshold_min {
            tracing::warn!(
                major = major_delta_threshold_min,
                critical = critical_delta_threshold_min,
                "偏差阈值顺序颠倒，使用默认阈值"
            );
            major_delta_threshold_min = DEFAULT_MAJOR_DELTA_THRESHOLD_MIN;
            critical_delta_threshold_min = DEFAULT_CRITICAL_DELTA_THRESHOLD_MIN;
        }
        let piece_unit_cost = reader.get_piece_unit_cost().await?;
        let wip_index_baseline = reader.get_wip_index_baseline().await?;
        let wip_index_scenario = reader.get_wip_index_scenario().await?;
        let top_bottleneck_count = reader.get_top_bottleneck_count().await?;
        let hourly_gross_rate = reader.get_hourly_gross_rate().await?;

        Ok(Self {
            major_delta_threshold_min,
            critical_delta_threshold_min,
            piece_unit_cost,
            wip_index_baseline,
            wip_index_scenario,
            top_bottleneck_count,
            hourly_gross_rate,
        })
    }
}
