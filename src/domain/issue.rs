// ==========================================
// 生产流程看板 - 问题记录
// ==========================================
// 依据: 看板前端 issues.json 契约
// 生命周期: 每次聚合生成一次，不修改，下次导入整体丢弃
// ==========================================

use crate::domain::types::{single_tag, IssueKind, Severity};
use serde::{Deserialize, Serialize};

/// 问题层级（当前只有工位级）
pub const ISSUE_LEVEL_STATION: &str = "poste";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IssueRecord {
    /// issue_<工位序号>
    pub id: String,

    pub level: String,

    #[serde(rename = "poste_id")]
    pub station_id: String,

    #[serde(rename = "macro_step")]
    pub macro_stage: String,

    #[serde(rename = "issue_type", with = "single_tag")]
    pub kind: IssueKind,

    #[serde(rename = "delta_cycle_min")]
    pub delta_minutes: f64,

    #[serde(rename = "nb_pieces")]
    pub piece_count: usize,

    #[serde(rename = "criticite_max")]
    pub severity: Severity,

    /// 件数 × 单件成本（币种由前端决定）
    #[serde(rename = "cout_total_pieces")]
    pub estimated_cost: f64,

    #[serde(rename = "niveau_experience")]
    pub experience_level: String,

    #[serde(rename = "type_alea")]
    pub anomaly_type: String,

    #[serde(rename = "categorie_cout_risque", default, skip_serializing_if = "Option::is_none")]
    pub cost_risk: Option<String>,

    pub summary: String,
}
