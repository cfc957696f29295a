// ==========================================
// 生产流程看板 - 问题分类器
// ==========================================
// 职责: 偏差超阈值的工位 → 结构化问题记录
// 规则:
// - 偏差 > 主要阈值: 生成问题
// - 偏差 > 严重阈值: bottleneck，否则 high_risk_part
// - 估算成本 = 件数 × 单件成本
// ==========================================

use crate::config::AggregationConfig;
use crate::domain::issue::{IssueRecord, ISSUE_LEVEL_STATION};
use crate::domain::record::{DEFAULT_EXPERIENCE_LEVEL, UNSPECIFIED_LABEL};
use crate::domain::types::IssueKind;
use crate::engine::station_aggregator::StationGroup;

pub struct IssueClassifier {
    major_threshold: f64,
    critical_threshold: f64,
    piece_unit_cost: f64,
}

impl IssueClassifier {
    pub fn new(config: &AggregationConfig) -> Self {
        Self {
            major_threshold: config.major_delta_threshold_min,
            critical_threshold: config.critical_delta_threshold_min,
            piece_unit_cost: config.piece_unit_cost,
        }
    }

    /// 单个工位 → 0 或 1 条问题记录
    ///
    /// # 参数
    /// - ordinal: 工位序号（问题 id 后缀，与 P<序号> 对应）
    /// - group: 工位聚合及其源记录（异常描述取首行）
    pub fn classify(&self, ordinal: usize, group: &StationGroup<'_>) -> Option<IssueRecord> {
        let station = &group.aggregate;
        let delta = station.kpi.delta_minutes;

        if delta <= self.major_threshold {
            return None;
        }

        let kind = if delta > self.critical_threshold {
            IssueKind::Bottleneck
        } else {
            IssueKind::HighRiskPart
        };

        let first = group.rows.first();
        let anomaly = first
            .and_then(|r| r.anomaly.clone())
            .unwrap_or_else(|| UNSPECIFIED_LABEL.to_string());
        let cause = first
            .and_then(|r| r.cause.clone())
            .unwrap_or_else(|| UNSPECIFIED_LABEL.to_string());
        let experience_level = first
            .and_then(|r| r.experience_level.clone())
            .unwrap_or_else(|| DEFAULT_EXPERIENCE_LEVEL.to_string());
        let cost_risk = first.and_then(|r| r.cost_risk.clone());

        tracing::debug!(
            station_id = %station.id,
            kind = %kind,
            delta = delta,
            "工位偏差超阈值，生成问题记录"
        );

        Some(IssueRecord {
            id: format!("issue_{}", ordinal),
            level: ISSUE_LEVEL_STATION.to_string(),
            station_id: station.id.clone(),
            macro_stage: station.macro_stage.clone(),
            kind,
            delta_minutes: delta,
            piece_count: station.kpi.piece_count,
            severity: station.kpi.severity,
            estimated_cost: station.kpi.piece_count as f64 * self.piece_unit_cost,
            experience_level,
            summary: format!("{} : {} - {}", station.label, anomaly, cause),
            anomaly_type: anomaly,
            cost_risk,
        })
    }

    /// 全部工位 → 问题列表（保持工位顺序）
    pub fn classify_all(&self, groups: &[StationGroup<'_>]) -> Vec<IssueRecord> {
        groups
            .iter()
            .enumerate()
            .filter_map(|(idx, group)| self.classify(idx + 1, group))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::record::ProductionRecord;
    use crate::domain::station::{StationAggregate, StationKpi};
    use crate::domain::types::Severity;

    fn group_with_delta<'a>(delta: f64, rows: Vec<&'a ProductionRecord>) -> StationGroup<'a> {
        let config = AggregationConfig::default();
        StationGroup {
            aggregate: StationAggregate {
                id: "P1".to_string(),
                label: "Presse".to_string(),
                macro_stage: "Emboutissage".to_string(),
                kpi: StationKpi {
                    planned_avg_minutes: 10.0,
                    actual_avg_minutes: 10.0 + delta,
                    delta_minutes: delta,
                    severity: Severity::classify(
                        delta,
                        config.major_delta_threshold_min,
                        config.critical_delta_threshold_min,
                    ),
                    piece_count: rows.len(),
                },
            },
            rows,
        }
    }

    #[test]
    fn test_no_issue_at_threshold() {
        let row = ProductionRecord::new("Presse", "Emboutissage", 1);
        let classifier = IssueClassifier::new(&AggregationConfig::default());

        assert!(classifier.classify(1, &group_with_delta(5.0, vec![&row])).is_none());
        assert!(classifier.classify(1, &group_with_delta(-8.0, vec![&row])).is_none());
    }

    #[test]
    fn test_high_risk_part_just_above_major() {
        let row = ProductionRecord::new("Presse", "Emboutissage", 1);
        let classifier = IssueClassifier::new(&AggregationConfig::default());

        let issue = classifier
            .classify(1, &group_with_delta(5.01, vec![&row]))
            .expect("应生成问题");
        assert_eq!(issue.kind, IssueKind::HighRiskPart);
        assert_eq!(issue.severity, Severity::Major);
    }

    #[test]
    fn test_bottleneck_just_above_critical() {
        let row = ProductionRecord::new("Presse", "Emboutissage", 1);
        let classifier = IssueClassifier::new(&AggregationConfig::default());

        let issue = classifier
            .classify(1, &group_with_delta(10.01, vec![&row]))
            .expect("应生成问题");
        assert_eq!(issue.kind, IssueKind::Bottleneck);
        assert_eq!(issue.severity, Severity::Critical);
    }

    #[test]
    fn test_cost_and_defaults() {
        let rows = vec![
            ProductionRecord::new("Presse", "Emboutissage", 1),
            ProductionRecord::new("Presse", "Emboutissage", 2),
        ];
        let refs: Vec<&ProductionRecord> = rows.iter().collect();
        let classifier = IssueClassifier::new(&AggregationConfig::default());

        let issue = classifier.classify(4, &group_with_delta(7.0, refs)).unwrap();
        assert_eq!(issue.id, "issue_4");
        assert_eq!(issue.level, "poste");
        assert_eq!(issue.estimated_cost, 100_000.0);
        assert_eq!(issue.anomaly_type, "Non spécifié");
        assert_eq!(issue.experience_level, "Opérateur");
        assert_eq!(issue.summary, "Presse : Non spécifié - Non spécifié");
        assert_eq!(issue.cost_risk, None);
    }

    #[test]
    fn test_anomaly_read_from_first_row() {
        let first = ProductionRecord::new("Presse", "Emboutissage", 1)
            .with_anomaly("Panne outillage", "Usure matrice");
        let second = ProductionRecord::new("Presse", "Emboutissage", 2)
            .with_anomaly("Autre", "Autre");
        let classifier = IssueClassifier::new(&AggregationConfig::default());

        let issue = classifier
            .classify(1, &group_with_delta(12.0, vec![&first, &second]))
            .unwrap();
        assert_eq!(issue.anomaly_type, "Panne outillage");
        assert_eq!(issue.summary, "Presse : Panne outillage - Usure matrice");
    }
}
