// ==========================================
// 导入器集成测试
// ==========================================
// 测试目标: 文件 → 原始行 → 生产记录 → 看板快照
// ==========================================


use std::sync::Arc;

use production_flow::config::{config_keys, ConfigManager};
use production_flow::importer::{
    CsvParser, DashboardImporter, DashboardImporterImpl, ExcelParser, FileParser, ImportError,
    RecordMapper,
};
use production_flow::{IssueKind, Severity};
use test_helpers::{assert_close, create_test_db, sample_csv, sample_xlsx, write_temp_csv};

fn build_importer(db_path: &str) -> (Arc<ConfigManager>, DashboardImporterImpl<ConfigManager>) {
    let config = Arc::new(ConfigManager::new(db_path).expect("Failed to create config manager"));
    (config.clone(), DashboardImporterImpl::new(config))
}

#[test]
fn test_sample_rows_are_mapped() {
    let rows = CsvParser
        .parse_to_raw_records(&sample_csv())
        .expect("Failed to parse sample");
    let records = RecordMapper.map_all(&rows);

    assert_eq!(records.len(), 8);
    assert_eq!(records[2].station, "Presse 1");
    assert_eq!(records[2].macro_stage, "Emboutissage");
    assert_eq!(records[2].anomaly.as_deref(), Some("Panne machine"));
    assert_eq!(records[7].planned_time.as_deref(), Some("abc"));
    assert_eq!(records[7].actual_time, None);
}

#[tokio::test]
async fn test_import_sample_file() {
    let (_temp_file, db_path) = create_test_db().expect("Failed to create test db");
    let (_config, importer) = build_importer(&db_path);

    let snapshot = importer
        .import_file(&sample_csv())
        .await
        .expect("Import should succeed");
    let dashboard = &snapshot.dashboard;

    assert_eq!(snapshot.row_count, 8);

    // 工位
    let ids: Vec<&str> = dashboard.graph.detail.nodes.iter().map(|n| n.id.as_str()).collect();
    assert_eq!(ids, vec!["P1", "P2", "P3", "P4", "P5"]);
    let presse = &dashboard.graph.detail.nodes[1];
    assert_close(presse.kpi.planned_avg_minutes, 10.0);
    assert_close(presse.kpi.actual_avg_minutes, 21.0);
    assert_eq!(presse.kpi.severity, Severity::Critical);
    assert_eq!(presse.kpi.piece_count, 2);

    // 非法时间按 0 计
    let controle = &dashboard.graph.detail.nodes[4];
    assert_eq!(controle.kpi.planned_avg_minutes, 0.0);
    assert_eq!(controle.kpi.actual_avg_minutes, 0.0);

    // 工序
    let stages: Vec<&str> = dashboard
        .graph
        .macro_layer
        .nodes
        .iter()
        .map(|n| n.label.as_str())
        .collect();
    assert_eq!(stages, vec!["Découpe", "Emboutissage", "Assemblage", "Finition"]);
    assert_eq!(dashboard.graph.macro_layer.edges.len(), 3);
    assert_eq!(dashboard.graph.detail.edges.len(), 4);
    assert_close(dashboard.graph.macro_layer.nodes[0].kpi.leadtime_minutes, 18.4);
    assert_close(dashboard.graph.macro_layer.nodes[0].kpi.delta_minutes, 6.0);

    // 问题
    assert_eq!(dashboard.issues.len(), 2);
    let bottleneck = &dashboard.issues[0];
    assert_eq!(bottleneck.id, "issue_2");
    assert_eq!(bottleneck.station_id, "P2");
    assert_eq!(bottleneck.kind, IssueKind::Bottleneck);
    assert_eq!(bottleneck.estimated_cost, 100_000.0);
    assert_eq!(bottleneck.summary, "Presse 1 : Panne machine - Usure outillage");
    let risk = &dashboard.issues[1];
    assert_eq!(risk.kind, IssueKind::HighRiskPart);
    assert_eq!(risk.severity, Severity::Major);

    // 全局 KPI
    assert_eq!(dashboard.kpis.leadtime_planned_minutes, 62);
    assert_eq!(dashboard.kpis.leadtime_actual_minutes, 92);
    assert_eq!(dashboard.kpis.delta_leadtime_minutes, 30);
    let top: Vec<(&str, i64)> = dashboard
        .kpis
        .top_macro_bottlenecks
        .iter()
        .map(|b| (b.macro_stage.as_str(), b.delta_total_minutes))
        .collect();
    assert_eq!(top, vec![("Emboutissage", 11), ("Assemblage", 7), ("Finition", 1)]);

    // 分析视图
    assert_close(dashboard.analytics.budget.total_saved_minutes, 18.5);
    assert_close(
        dashboard.analytics.budget.total_saved_euros,
        18.5 / 60.0 * 38.53,
    );
}

#[tokio::test]
async fn test_alias_headers_give_same_dashboard() {
    let (_temp_file, db_path) = create_test_db().expect("Failed to create test db");
    let (_config, importer) = build_importer(&db_path);

    let spaced = write_temp_csv(&[
        "Nom,Poste,Temps Prévu,Temps Réel",
        "A,Stage1,0:10:00,0:16:00",
        "B,Stage1,0:05:00,0:05:00",
    ])
    .unwrap();
    let underscored = write_temp_csv(&[
        "Nom,Poste,Temps_Prévu,Temps_Réel",
        "A,Stage1,0:10:00,0:16:00",
        "B,Stage1,0:05:00,0:05:00",
    ])
    .unwrap();

    let first = importer.import_file(spaced.path()).await.unwrap();
    let second = importer.import_file(underscored.path()).await.unwrap();

    assert_eq!(first.dashboard, second.dashboard);
    assert_ne!(first.batch_id, second.batch_id);
}

#[tokio::test]
async fn test_thresholds_from_config() {
    let (_temp_file, db_path) = create_test_db().expect("Failed to create test db");
    let (config, importer) = build_importer(&db_path);
    config
        .set_config_value(config_keys::CRITICAL_DELTA_THRESHOLD_MIN, "20")
        .unwrap();
    config
        .set_config_value(config_keys::PIECE_UNIT_COST, "1000")
        .unwrap();

    let snapshot = importer.import_file(&sample_csv()).await.unwrap();
    let presse_issue = &snapshot.dashboard.issues[0];

    // 偏差 11 < 20: 不再是瓶颈
    assert_eq!(presse_issue.kind, IssueKind::HighRiskPart);
    assert_eq!(presse_issue.severity, Severity::Major);
    assert_eq!(presse_issue.estimated_cost, 2000.0);
}

#[tokio::test]
async fn test_header_only_file_yields_empty_dashboard() {
    let (_temp_file, db_path) = create_test_db().expect("Failed to create test db");
    let (_config, importer) = build_importer(&db_path);
    let file = write_temp_csv(&["Nom,Poste,Temps Prévu,Temps Réel"]).unwrap();

    let snapshot = importer.import_file(file.path()).await.unwrap();

    assert_eq!(snapshot.row_count, 0);
    assert!(snapshot.dashboard.graph.detail.nodes.is_empty());
    assert!(snapshot.dashboard.issues.is_empty());
    assert_eq!(snapshot.dashboard.kpis.leadtime_actual_minutes, 0);
    assert_eq!(snapshot.dashboard.kpis.wip_index_baseline, 18_400);
}

#[tokio::test]
async fn test_unsupported_extension() {
    let (_temp_file, db_path) = create_test_db().expect("Failed to create test db");
    let (_config, importer) = build_importer(&db_path);
    let file = tempfile::Builder::new().suffix(".txt").tempfile().unwrap();

    let result = importer.import_file(file.path()).await;

    assert!(matches!(result, Err(ImportError::UnsupportedFormat(_))));
}

#[tokio::test]
async fn test_non_finite_threshold_does_not_flag_every_station() {
    let (_temp_file, db_path) = create_test_db().expect("Failed to create test db");
    let (config, importer) = build_importer(&db_path);
    config
        .set_config_value(config_keys::MAJOR_DELTA_THRESHOLD_MIN, "NaN")
        .unwrap();
    let file = write_temp_csv(&[
        "Nom,Poste,Temps Prévu,Temps Réel",
        "Laser,Découpe,0:30:00,0:05:00",
    ])
    .unwrap();

    let snapshot = importer.import_file(file.path()).await.unwrap();

    assert!(snapshot.dashboard.issues.is_empty());
    assert_eq!(
        snapshot.dashboard.graph.detail.nodes[0].kpi.severity,
        Severity::Minor
    );
}

#[test]
fn test_blank_rows_keep_source_row_numbers() {
    let file = write_temp_csv(&[
        "Nom,Poste,Temps Prévu,Temps Réel",
        "Tour,Usinage,0:10:00,0:12:00",
        ",,,",
        ",,,",
        "Four,Traitement,0:30:00,0:30:00",
    ])
    .unwrap();

    let rows = CsvParser.parse_to_raw_records(file.path()).unwrap();
    let records = RecordMapper.map_all(&rows);

    assert_eq!(records.len(), 2);
    assert_eq!(records[0].row_number, 1);
    assert_eq!(records[1].row_number, 4);
}

#[tokio::test]
async fn test_excel_import_matches_csv_import() {
    let (_temp_file, db_path) = create_test_db().expect("Failed to create test db");
    let (_config, importer) = build_importer(&db_path);

    let rows = ExcelParser
        .parse_to_raw_records(&sample_xlsx())
        .expect("Failed to parse xlsx sample");
    let records = RecordMapper.map_all(&rows);
    assert_eq!(records.len(), 8);
    assert_eq!(records[3].station, "Presse 1");
    assert_eq!(records[3].row_number, 5);

    let from_excel = importer.import_file(&sample_xlsx()).await.unwrap();
    let from_csv = importer.import_file(&sample_csv()).await.unwrap();
    let excel = &from_excel.dashboard;
    let csv = &from_csv.dashboard;

    assert_eq!(from_excel.row_count, 8);
    assert_eq!(excel.graph.detail.nodes.len(), csv.graph.detail.nodes.len());
    for (x, c) in excel.graph.detail.nodes.iter().zip(&csv.graph.detail.nodes) {
        assert_eq!(x.label, c.label);
        assert_close(x.kpi.planned_avg_minutes, c.kpi.planned_avg_minutes);
        assert_close(x.kpi.actual_avg_minutes, c.kpi.actual_avg_minutes);
        assert_eq!(x.kpi.severity, c.kpi.severity);
    }
    assert_eq!(excel.kpis.leadtime_planned_minutes, csv.kpis.leadtime_planned_minutes);
    assert_eq!(excel.kpis.leadtime_actual_minutes, csv.kpis.leadtime_actual_minutes);
    assert_eq!(
        excel.kpis.top_macro_bottlenecks[..2],
        csv.kpis.top_macro_bottlenecks[..2]
    );
    let issues: Vec<(&str, IssueKind)> = excel
        .issues
        .iter()
        .map(|i| (i.station_id.as_str(), i.kind))
        .collect();
    assert_eq!(issues, vec![("P2", IssueKind::Bottleneck), ("P3", IssueKind::HighRiskPart)]);
}
