// ==========================================
// 生产流程看板 - 全局 KPI 汇总器
// ==========================================
// 职责: 工位聚合 → 全局交付周期 / 偏差 / 瓶颈工序排名
// 说明: WIP 指数为配置常量占位，不从输入推导
// ==========================================

use crate::config::AggregationConfig;
use crate::domain::kpi::{GlobalKpiSummary, MacroBottleneck};
use crate::domain::station::StationAggregate;
use crate::engine::graph_builder::{distinct_stages, weighted_totals};

pub struct KpiSummarizer {
    wip_index_baseline: i64,
    wip_index_scenario: i64,
    top_count: usize,
}

impl KpiSummarizer {
    pub fn new(config: &AggregationConfig) -> Self {
        Self {
            wip_index_baseline: config.wip_index_baseline,
            wip_index_scenario: config.wip_index_scenario,
            top_count: config.top_bottleneck_count,
        }
    }

    pub fn summarize(&self, stations: &[StationAggregate]) -> GlobalKpiSummary {
        let (planned_total, actual_total) = weighted_totals(stations);

        GlobalKpiSummary {
            leadtime_planned_minutes: round_half_up(planned_total),
            leadtime_actual_minutes: round_half_up(actual_total),
            delta_leadtime_minutes: round_half_up(actual_total - planned_total),
            wip_index_baseline: self.wip_index_baseline,
            wip_index_scenario: self.wip_index_scenario,
            delta_wip_index: self.wip_index_baseline - self.wip_index_scenario,
            top_macro_bottlenecks: self.rank_macro_bottlenecks(stations),
        }
    }

    /// 工序按工位偏差之和降序排名
    ///
    /// # 说明
    /// - 按取整后的值排序（稳定排序，并列保持首次出现顺序）
    /// - 截取前 top_count 个
    fn rank_macro_bottlenecks(&self, stations: &[StationAggregate]) -> Vec<MacroBottleneck> {
        let mut ranking: Vec<MacroBottleneck> = distinct_stages(stations)
            .into_iter()
            .map(|stage| {
                let delta_sum: f64 = stations
                    .iter()
                    .filter(|s| s.macro_stage == stage)
                    .map(|s| s.kpi.delta_minutes)
                    .sum();
                MacroBottleneck {
                    macro_stage: stage.to_string(),
                    delta_total_minutes: round_half_up(delta_sum),
                }
            })
            .collect();

        ranking.sort_by(|a, b| b.delta_total_minutes.cmp(&a.delta_total_minutes));
        ranking.truncate(self.top_count);
        ranking
    }
}

/// 四舍五入到整数，.5 向正无穷方向
pub fn round_half_up(value: f64) -> i64 {
    if !value.is_finite() {
        return 0;
    }
    (value + 0.5).floor() as i64
}
