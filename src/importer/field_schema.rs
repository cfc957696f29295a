// ==========================================
// 生产流程看板 - 字段表头候选表
// ==========================================
// 职责: 逻辑字段 → 有序候选表头；按顺序取第一个存在且非空的值
// 说明: 外部表格表头不规范（空格/下划线、组合/分解重音、去重音），
//       所有别名集中在此，其他位置不做临时兜底
// ==========================================

use crate::importer::file_parser::RawRecord;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LogicalField {
    Station,
    MacroStage,
    PlannedTime,
    ActualTime,
    CostRisk,
    Anomaly,
    Cause,
    ExperienceLevel,
}

impl LogicalField {
    pub const ALL: [LogicalField; 8] = [
        LogicalField::Station,
        LogicalField::MacroStage,
        LogicalField::PlannedTime,
        LogicalField::ActualTime,
        LogicalField::CostRisk,
        LogicalField::Anomaly,
        LogicalField::Cause,
        LogicalField::ExperienceLevel,
    ];

    /// 候选表头（优先级从高到低）
    pub fn candidates(self) -> &'static [&'static str] {
        match self {
            LogicalField::Station => &["Nom", "nom", "NOM", "Station"],
            LogicalField::MacroStage => &["Poste", "poste", "POSTE", "Étape", "Etape"],
            LogicalField::PlannedTime => &[
                "Temps Prévu",
                "Temps_Prévu",
                "Temps Pre\u{301}vu",
                "Temps_Pre\u{301}vu",
                "Temps Prevu",
                "Temps_Prevu",
            ],
            LogicalField::ActualTime => &[
                "Temps Réel",
                "Temps_Réel",
                "Temps Re\u{301}el",
                "Temps_Re\u{301}el",
                "Temps Reel",
                "Temps_Reel",
            ],
            LogicalField::CostRisk => &[
                "Catégorie Coût Risque",
                "Catégorie_Coût_Risque",
                "Categorie Cout Risque",
                "Categorie_Cout_Risque",
                "Coût Risque",
            ],
            LogicalField::Anomaly => &[
                "Aléas Industriels",
                "Aléas_Industriels",
                "Ale\u{301}as Industriels",
                "Ale\u{301}as_Industriels",
                "Aleas Industriels",
                "Aleas_Industriels",
            ],
            LogicalField::Cause => &[
                "Cause Potentielle",
                "Cause_Potentielle",
                "Cause",
            ],
            LogicalField::ExperienceLevel => &[
                "Niveau Expérience",
                "Niveau_Expérience",
                "Niveau Experience",
                "Niveau_Experience",
            ],
        }
    }
}

// ==========================================
// FieldReader - 容错字段读取器
// ==========================================
pub struct FieldReader<'a> {
    row: &'a RawRecord,
}

impl<'a> FieldReader<'a> {
    pub fn new(row: &'a RawRecord) -> Self {
        Self { row }
    }

    /// 第一个存在且非空的候选值
    pub fn get(&self, field: LogicalField) -> Option<&'a str> {
        field
            .candidates()
            .iter()
            .filter_map(|key| self.row.get(*key))
            .map(|v| v.trim())
            .find(|v| !v.is_empty())
    }

    pub fn get_or(&self, field: LogicalField, default: &str) -> String {
        self.get(field).unwrap_or(default).to_string()
    }

    pub fn get_owned(&self, field: LogicalField) -> Option<String> {
        self.get(field).map(str::to_string)
    }
}
