// ==========================================
// 生产流程看板 - 分析引擎
// ==========================================
// 职责: 由 detail 节点推导分析视图
// - 计划/实际对比
// - 按工序求和的交付周期与偏差
// - 严重度分布
// - 节省预算: max(0, 实际 - 计划) 分钟 × 小时工资
// ==========================================

use crate::domain::analytics::{
    BudgetSummary, CycleComparison, ProductionAnalytics, SeverityCount, StageBreakdown,
    StageSaving, StationSaving,
};
use crate::domain::station::StationAggregate;

/// 预算榜单长度
pub const TOP_SAVINGS_COUNT: usize = 10;

pub struct AnalyticsEngine {
    hourly_gross_rate: f64,
}

impl AnalyticsEngine {
    pub fn new(hourly_gross_rate: f64) -> Self {
        Self { hourly_gross_rate }
    }

    pub fn compute(&self, stations: &[StationAggregate]) -> ProductionAnalytics {
        ProductionAnalytics {
            cycle_comparison: cycle_comparison(stations),
            stage_breakdown: stage_breakdown(stations),
            severity_distribution: severity_distribution(stations),
            budget: self.budget(stations),
        }
    }

    fn budget(&self, stations: &[StationAggregate]) -> BudgetSummary {
        let savings: Vec<StationSaving> = stations
            .iter()
            .map(|s| {
                let planned = s.kpi.planned_avg_minutes;
                let actual = s.kpi.actual_avg_minutes;
                let saved_minutes = (actual - planned).max(0.0);
                StationSaving {
                    name: s.label.clone(),
                    macro_stage: s.macro_stage.clone(),
                    planned_minutes: planned,
                    actual_minutes: actual,
                    saved_minutes,
                    saved_euros: saved_minutes / 60.0 * self.hourly_gross_rate,
                }
            })
            .collect();

        let total_saved_minutes: f64 = savings.iter().map(|s| s.saved_minutes).sum();
        let total_saved_euros: f64 = savings.iter().map(|s| s.saved_euros).sum();
        let avg_saved_euros = if savings.is_empty() {
            0.0
        } else {
            total_saved_euros / savings.len() as f64
        };
        let max_saved_euros = savings
            .iter()
            .map(|s| s.saved_euros)
            .fold(0.0_f64, f64::max);

        // 按工序汇总（首次出现顺序）
        let mut stages: Vec<StageSaving> = Vec::new();
        for saving in &savings {
            match stages.iter_mut().find(|st| st.name == saving.macro_stage) {
                Some(stage) => {
                    stage.saved_minutes += saving.saved_minutes;
                    stage.saved_euros += saving.saved_euros;
                }
                None => stages.push(StageSaving {
                    name: saving.macro_stage.clone(),
                    saved_minutes: saving.saved_minutes,
                    saved_euros: saving.saved_euros,
                }),
            }
        }

        let mut top_stations = savings.clone();
        top_stations.sort_by(|a, b| b.saved_euros.total_cmp(&a.saved_euros));
        top_stations.truncate(TOP_SAVINGS_COUNT);

        BudgetSummary {
            hourly_gross_rate: self.hourly_gross_rate,
            total_saved_minutes,
            total_saved_euros,
            avg_saved_euros,
            max_saved_euros,
            stations: savings,
            stages,
            top_stations,
        }
    }
}

fn cycle_comparison(stations: &[StationAggregate]) -> Vec<CycleComparison> {
    stations
        .iter()
        .map(|s| CycleComparison {
            name: s.label.clone(),
            macro_stage: s.macro_stage.clone(),
            planned_minutes: s.kpi.planned_avg_minutes,
            actual_minutes: s.kpi.actual_avg_minutes,
            delta_minutes: s.kpi.delta_minutes,
        })
        .collect()
}

fn stage_breakdown(stations: &[StationAggregate]) -> Vec<StageBreakdown> {
    let mut stages: Vec<StageBreakdown> = Vec::new();
    for s in stations {
        match stages.iter_mut().find(|st| st.name == s.macro_stage) {
            Some(stage) => {
                stage.leadtime_minutes += s.kpi.actual_avg_minutes;
                stage.delta_minutes += s.kpi.delta_minutes;
            }
            None => stages.push(StageBreakdown {
                name: s.macro_stage.clone(),
                leadtime_minutes: s.kpi.actual_avg_minutes,
                delta_minutes: s.kpi.delta_minutes,
            }),
        }
    }
    stages
}

fn severity_distribution(stations: &[StationAggregate]) -> Vec<SeverityCount> {
    let mut counts: Vec<SeverityCount> = Vec::new();
    for s in stations {
        match counts.iter_mut().find(|c| c.severity == s.kpi.severity) {
            Some(entry) => entry.count += 1,
            None => counts.push(SeverityCount {
                severity: s.kpi.severity,
                count: 1,
            }),
        }
    }
    counts
}
