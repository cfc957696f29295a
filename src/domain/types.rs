// ==========================================
// 生产流程看板 - 领域类型定义
// ==========================================
// 职责: 严重度等级 / 问题分类标签
// 序列化格式: 与看板前端约定一致（法文标签）
// ==========================================

use serde::{Deserialize, Serialize};
use std::fmt;

// ==========================================
// 严重度 (Severity / criticité)
// ==========================================
// 顺序: Minor < Major < Critical
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Severity {
    #[serde(rename = "Mineure")]
    Minor, // 偏差 <= 主要阈值
    #[serde(rename = "Majeure")]
    Major, // 主要阈值 < 偏差 <= 严重阈值
    #[serde(rename = "Critique")]
    Critical, // 偏差 > 严重阈值
}

impl Severity {
    /// 按偏差分钟数判定严重度（严格大于）
    ///
    /// # 参数
    /// - delta: 实际 - 计划（分钟）
    /// - major_threshold: 主要阈值（默认 5）
    /// - critical_threshold: 严重阈值（默认 10）
    pub fn classify(delta: f64, major_threshold: f64, critical_threshold: f64) -> Self {
        if delta > critical_threshold {
            Severity::Critical
        } else if delta > major_threshold {
            Severity::Major
        } else {
            Severity::Minor
        }
    }

    /// 前端约定的标签
    pub fn label(&self) -> &'static str {
        match self {
            Severity::Minor => "Mineure",
            Severity::Major => "Majeure",
            Severity::Critical => "Critique",
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

// ==========================================
// 问题分类标签 (Issue Kind)
// ==========================================
// 二元分类: 瓶颈 / 高风险零件，无多标签组合
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IssueKind {
    Bottleneck,   // 偏差 > 严重阈值
    HighRiskPart, // 主要阈值 < 偏差 <= 严重阈值
}

impl fmt::Display for IssueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IssueKind::Bottleneck => write!(f, "bottleneck"),
            IssueKind::HighRiskPart => write!(f, "high_risk_part"),
        }
    }
}

/// 前端以单元素数组承载 `issue_type`，这里保持单标签语义
pub(crate) mod single_tag {
    use super::IssueKind;
    use serde::de::Error as _;
    use serde::{Deserialize, Deserializer, Serialize, Serializer};

    pub fn serialize<S: Serializer>(kind: &IssueKind, serializer: S) -> Result<S::Ok, S::Error> {
        [kind].serialize(serializer)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<IssueKind, D::Error> {
        let tags = Vec::<IssueKind>::deserialize(deserializer)?;
        // 多标签时以最严重者为准
        if tags.contains(&IssueKind::Bottleneck) {
            return Ok(IssueKind::Bottleneck);
        }
        tags.into_iter()
            .next()
            .ok_or_else(|| D::Error::custom("issue_type 不能为空数组"))
    }
}
