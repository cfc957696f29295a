// ==========================================
// 生产流程看板 - 字段映射器实现
// ==========================================
// 职责: 原始行 → ProductionRecord
// 说明: 时间保留原始文本；缺失的工位/工序名称取 "Unknown"
// ==========================================

use crate::domain::record::{ProductionRecord, UNKNOWN_LABEL};
use crate::importer::field_schema::{FieldReader, LogicalField};
use crate::importer::file_parser::RawRecord;

pub struct RecordMapper;

impl RecordMapper {
    /// 单行映射（不会失败）；行号沿用原始行在源文件中的位置
    pub fn map(&self, row: &RawRecord) -> ProductionRecord {
        let reader = FieldReader::new(row);

        ProductionRecord {
            station: reader.get_or(LogicalField::Station, UNKNOWN_LABEL),
            macro_stage: reader.get_or(LogicalField::MacroStage, UNKNOWN_LABEL),
            planned_time: reader.get_owned(LogicalField::PlannedTime),
            actual_time: reader.get_owned(LogicalField::ActualTime),
            cost_risk: reader.get_owned(LogicalField::CostRisk),
            anomaly: reader.get_owned(LogicalField::Anomaly),
            cause: reader.get_owned(LogicalField::Cause),
            experience_level: reader.get_owned(LogicalField::ExperienceLevel),
            row_number: row.row_number,
        }
    }

    pub fn map_all(&self, rows: &[RawRecord]) -> Vec<ProductionRecord> {
        rows.iter().map(|row| self.map(row)).collect()
    }
}
