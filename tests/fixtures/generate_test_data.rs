// ==========================================
// 测试数据生成器
// ==========================================
// 用途: 生成生产记录测试数据集 CSV 文件（确定性，可重复生成）
// 输出: tests/fixtures/datasets/*.csv
// ==========================================

use csv::Writer;
use std::error::Error;
use std::fs::{self, File};

const OUTPUT_DIR: &str = "tests/fixtures/datasets";

// CSV 表头（法文列名，与生产现场导出一致）
const CSV_HEADER: &[&str] = &[
    "Nom",
    "Poste",
    "Temps Prévu",
    "Temps Réel",
    "Aléas Industriels",
    "Cause Potentielle",
];

// 下划线变体表头
const CSV_HEADER_UNDERSCORE: &[&str] = &[
    "Nom",
    "Poste",
    "Temps_Prévu",
    "Temps_Réel",
    "Aléas_Industriels",
    "Cause_Potentielle",
];

// 工序 → 工位
const LINE: &[(&str, &[&str])] = &[
    ("Découpe", &["Cisaille", "Laser"]),
    ("Emboutissage", &["Presse 1", "Presse 2"]),
    ("Assemblage", &["Soudure", "Rivetage", "Collage"]),
    ("Finition", &["Peinture", "Contrôle"]),
];

const ANOMALIES: &[(&str, &str)] = &[
    ("Panne machine", "Usure outillage"),
    ("Manque matière", "Retard fournisseur"),
    ("Réglage", "Changement de série"),
];

#[derive(Clone)]
struct ProductionRow {
    station: String,
    stage: String,
    planned: String,
    actual: String,
    anomaly: String,
    cause: String,
}

impl ProductionRow {
    fn to_record(&self) -> Vec<String> {
        vec![
            self.station.clone(),
            self.stage.clone(),
            self.planned.clone(),
            self.actual.clone(),
            self.anomaly.clone(),
            self.cause.clone(),
        ]
    }
}

/// 线性同余序列（固定种子，保证输出稳定）
struct Sequence(u64);

impl Sequence {
    fn next(&mut self, bound: u64) -> u64 {
        self.0 = self.0.wrapping_mul(6364136223846793005).wrapping_add(1442695040888963407);
        (self.0 >> 33) % bound
    }
}

fn clock(seconds: u64) -> String {
    format!("{}:{:02}:{:02}", seconds / 3600, (seconds % 3600) / 60, seconds % 60)
}

fn main() -> Result<(), Box<dyn Error>> {
    println!("开始生成测试数据集...");
    fs::create_dir_all(OUTPUT_DIR)?;

    let rows = build_line_rows(5, 42);

    write_dataset("01_normal_line.csv", CSV_HEADER, &rows)?;
    println!("✓ 生成 01_normal_line.csv ({}条)", rows.len());

    write_dataset("02_underscore_headers.csv", CSV_HEADER_UNDERSCORE, &rows)?;
    println!("✓ 生成 02_underscore_headers.csv ({}条)", rows.len());

    let fractional = to_fractional_days(&rows);
    write_dataset("03_fractional_days.csv", CSV_HEADER, &fractional)?;
    println!("✓ 生成 03_fractional_days.csv ({}条)", fractional.len());

    let large = build_large_rows(40, 7);
    write_dataset("04_many_stations.csv", CSV_HEADER, &large)?;
    println!("✓ 生成 04_many_stations.csv ({}条)", large.len());

    println!("✓ 所有测试数据集生成完成！");
    Ok(())
}

/// 每个工位 pieces 件，实际时间在计划时间上下浮动
fn build_line_rows(pieces: usize, seed: u64) -> Vec<ProductionRow> {
    let mut seq = Sequence(seed);
    let mut rows = Vec::new();

    for (stage, stations) in LINE {
        for station in stations.iter() {
            let planned = 300 + seq.next(10) * 60;
            for _ in 0..pieces {
                // -2 .. +14 分钟
                let drift = seq.next(17) as i64 - 2;
                let actual = (planned as i64 + drift * 60).max(0) as u64;
                let (anomaly, cause) = if drift > 5 {
                    ANOMALIES[seq.next(ANOMALIES.len() as u64) as usize]
                } else {
                    ("", "")
                };
                rows.push(ProductionRow {
                    station: station.to_string(),
                    stage: stage.to_string(),
                    planned: clock(planned),
                    actual: clock(actual),
                    anomaly: anomaly.to_string(),
                    cause: cause.to_string(),
                });
            }
        }
    }

    rows
}

/// 超过 10 个工位，覆盖上下文截断
fn build_large_rows(stations: usize, seed: u64) -> Vec<ProductionRow> {
    let mut seq = Sequence(seed);
    (0..stations)
        .map(|i| {
            let planned = 600 + seq.next(5) * 60;
            let actual = planned + seq.next(15) * 60;
            ProductionRow {
                station: format!("Poste {:02}", i + 1),
                stage: LINE[i % LINE.len()].0.to_string(),
                planned: clock(planned),
                actual: clock(actual),
                anomaly: String::new(),
                cause: String::new(),
            }
        })
        .collect()
}

/// 时间改写为天数小数（Excel 时间单元格导出为数值时的形态）
fn to_fractional_days(rows: &[ProductionRow]) -> Vec<ProductionRow> {
    rows.iter()
        .map(|row| {
            let mut row = row.clone();
            row.planned = days_of(&row.planned);
            row.actual = days_of(&row.actual);
            row
        })
        .collect()
}

fn days_of(clock: &str) -> String {
    let seconds: u64 = clock
        .split(':')
        .map(|part| part.parse::<u64>().unwrap_or(0))
        .fold(0, |acc, v| acc * 60 + v);
    format!("{:.8}", seconds as f64 / 86_400.0)
}

fn write_dataset(name: &str, header: &[&str], rows: &[ProductionRow]) -> Result<(), Box<dyn Error>> {
    let file = File::create(format!("{}/{}", OUTPUT_DIR, name))?;
    let mut wtr = Writer::from_writer(file);
    wtr.write_record(header)?;
    for row in rows {
        wtr.write_record(row.to_record())?;
    }
    wtr.flush()?;
    Ok(())
}
