// ==========================================
// 生产流程看板 - 生产记录实体
// ==========================================
// 职责: 一行表格记录映射后的逻辑字段
// 红线: 读入后不可变，无行号以外的身份
// ==========================================

use serde::{Deserialize, Serialize};

/// 缺省工位 / 工序名称
pub const UNKNOWN_LABEL: &str = "Unknown";

/// 缺省异常描述 / 潜在原因
pub const UNSPECIFIED_LABEL: &str = "Non spécifié";

/// 缺省操作员经验等级
pub const DEFAULT_EXPERIENCE_LEVEL: &str = "Opérateur";

// ==========================================
// ProductionRecord - 单条生产事件（一件零件）
// ==========================================
// 时间字段保留原始单元格文本，由时间解析器统一换算
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductionRecord {
    pub station: String,
    pub macro_stage: String,
    pub planned_time: Option<String>,
    pub actual_time: Option<String>,
    pub cost_risk: Option<String>,
    pub anomaly: Option<String>,
    pub cause: Option<String>,
    pub experience_level: Option<String>,

    // 元信息: 源文件数据行号（从 1 开始，不含表头，空白行占号）
    pub row_number: usize,
}

impl ProductionRecord {
    /// 以工位/工序构造最小记录（测试与手工构造用）
    pub fn new(station: &str, macro_stage: &str, row_number: usize) -> Self {
        Self {
            station: station.to_string(),
            macro_stage: macro_stage.to_string(),
            planned_time: None,
            actual_time: None,
            cost_risk: None,
            anomaly: None,
            cause: None,
            experience_level: None,
            row_number,
        }
    }

    pub fn with_times(mut self, planned: &str, actual: &str) -> Self {
        self.planned_time = Some(planned.to_string());
        self.actual_time = Some(actual.to_string());
        self
    }

    pub fn with_anomaly(mut self, anomaly: &str, cause: &str) -> Self {
        self.anomaly = Some(anomaly.to_string());
        self.cause = Some(cause.to_string());
        self
    }
}
