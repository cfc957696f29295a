// ==========================================
// 生产流程看板 - 工位聚合器
// ==========================================
// 职责: 按工位名称分组，计算计划/实际节拍均值、偏差、严重度
// 输入: 生产记录序列（行序）
// 输出: 按首次出现顺序排列的工位聚合（P1, P2, ...）
// ==========================================

use crate::config::AggregationConfig;
use crate::domain::record::ProductionRecord;
use crate::domain::station::{StationAggregate, StationKpi};
use crate::domain::types::Severity;
use crate::engine::time_parser::parse_time_to_minutes;
use std::collections::HashMap;

// ==========================================
// StationGroup - 工位聚合 + 源记录
// ==========================================
// 源记录供问题分类器读取异常描述
#[derive(Debug, Clone)]
pub struct StationGroup<'a> {
    pub aggregate: StationAggregate,
    pub rows: Vec<&'a ProductionRecord>,
}

// ==========================================
// StationAggregator
// ==========================================
pub struct StationAggregator {
    major_threshold: f64,
    critical_threshold: f64,
}

impl StationAggregator {
    pub fn new(config: &AggregationConfig) -> Self {
        Self {
            major_threshold: config.major_delta_threshold_min,
            critical_threshold: config.critical_delta_threshold_min,
        }
    }

    /// 单趟分组 + 逐组计算
    ///
    /// # 说明
    /// - 工位 id 按不同工位名首次出现的顺序分配
    /// - 该顺序决定下游 macro / detail 节点顺序
    pub fn aggregate<'a>(&self, records: &'a [ProductionRecord]) -> Vec<StationGroup<'a>> {
        // 1. 分组（保持首次出现顺序）
        let mut index_by_station: HashMap<&str, usize> = HashMap::new();
        let mut grouped: Vec<(&str, Vec<&'a ProductionRecord>)> = Vec::new();

        for record in records {
            let key = record.station.as_str();
            match index_by_station.get(key) {
                Some(&idx) => grouped[idx].1.push(record),
                None => {
                    index_by_station.insert(key, grouped.len());
                    grouped.push((key, vec![record]));
                }
            }
        }

        // 2. 逐组计算 KPI
        grouped
            .into_iter()
            .enumerate()
            .map(|(idx, (station, rows))| {
                let aggregate = self.build_aggregate(idx + 1, station, &rows);
                StationGroup { aggregate, rows }
            })
            .collect()
    }

    fn build_aggregate(
        &self,
        ordinal: usize,
        station: &str,
        rows: &[&ProductionRecord],
    ) -> StationAggregate {
        let planned_avg = mean(
            rows.iter().map(|r| parse_time_to_minutes(r.planned_time.as_deref())),
            rows.len(),
        );
        let actual_avg = mean(
            rows.iter().map(|r| parse_time_to_minutes(r.actual_time.as_deref())),
            rows.len(),
        );
        let delta = actual_avg - planned_avg;

        let macro_stage = rows
            .first()
            .map(|r| r.macro_stage.clone())
            .unwrap_or_else(|| crate::domain::record::UNKNOWN_LABEL.to_string());

        tracing::debug!(
            station = station,
            planned = planned_avg,
            actual = actual_avg,
            delta = delta,
            "工位聚合完成"
        );

        StationAggregate {
            id: station_id(ordinal),
            label: station.to_string(),
            macro_stage,
            kpi: StationKpi {
                planned_avg_minutes: planned_avg,
                actual_avg_minutes: actual_avg,
                delta_minutes: delta,
                severity: Severity::classify(delta, self.major_threshold, self.critical_threshold),
                piece_count: rows.len(),
            },
        }
    }
}

/// 工位 id: P<序号>
pub fn station_id(ordinal: usize) -> String {
    format!("P{}", ordinal)
}

/// 算术平均；空组为 0，不产生 NaN
fn mean(values: impl Iterator<Item = f64>, count: usize) -> f64 {
    if count == 0 {
        return 0.0;
    }
    values.sum::<f64>() / count as f64
}
