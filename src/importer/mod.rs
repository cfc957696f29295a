// ==========================================
// 生产流程看板 - 导入层
// ==========================================
// 职责: 表格文件 → 生产记录 → 看板快照
// 支持: Excel (.xlsx/.xls/.ods), CSV
// ==========================================

// 模块声明
pub mod dashboard_importer;
pub mod error;
pub mod field_mapper;
pub mod field_schema;
pub mod file_parser;

// 重导出核心类型
pub use dashboard_importer::{DashboardImporter, DashboardImporterImpl};
pub use error::{ImportError, ImportResult};
pub use field_mapper::RecordMapper;
pub use field_schema::{FieldReader, LogicalField};
pub use file_parser::{CsvParser, ExcelParser, FileParser, RawRecord, UniversalFileParser};
