// ==========================================
// 生产流程看板 - 配置管理器
// ==========================================
// 职责: 配置加载、查询、覆写管理
// 存储: config_kv 表 (key-value + scope)
// ==========================================

use crate::config::dashboard_config_trait::DashboardConfigReader;
use crate::config::aggregation_config::{
    DEFAULT_CRITICAL_DELTA_THRESHOLD_MIN, DEFAULT_HOURLY_GROSS_RATE,
    DEFAULT_MAJOR_DELTA_THRESHOLD_MIN, DEFAULT_PIECE_UNIT_COST, DEFAULT_TOP_BOTTLENECK_COUNT,
    DEFAULT_WIP_INDEX_BASELINE, DEFAULT_WIP_INDEX_SCENARIO,
};
use crate::db::{ensure_config_schema, open_sqlite_connection};
use async_trait::async_trait;
use rusqlite::{params, Connection, OptionalExtension};
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::collections::BTreeMap;
use std::error::Error;
use std::str::FromStr;
use std::sync::{Arc, Mutex};

/// 配置项（列表展示用）
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConfigEntry {
    pub key: String,
    pub value: String,
    pub updated_at: String,
}

// ==========================================
// ConfigManager - 配置管理器
// ==========================================
pub struct ConfigManager {
    conn: Arc<Mutex<Connection>>,
}

impl ConfigManager {
    /// 创建新的 ConfigManager 实例（必要时建表）
    ///
    /// # 参数
    /// - db_path: 数据库文件路径（":memory:" 为内存库）
    pub fn new(db_path: &str) -> Result<Self, Box<dyn Error>> {
        let conn = open_sqlite_connection(db_path)?;
        ensure_config_schema(&conn)?;

        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    /// 从 config_kv 表读取配置值（scope_id='global'）
    ///
    /// # 返回
    /// - Some(String): 配置值
    /// - None: 配置不存在
    pub fn get_config_value(&self, key: &str) -> Result<Option<String>, Box<dyn Error>> {
        let conn = self.conn.lock().map_err(|e| format!("锁获取失败: {}", e))?;

        let value = conn
            .query_row(
                "SELECT value FROM config_kv WHERE scope_id = 'global' AND key = ?1",
                params![key],
                |row| row.get::<_, String>(0),
            )
            .optional()?;

        Ok(value)
    }

    /// 写入配置值（UPSERT）
    pub fn set_config_value(&self, key: &str, value: &str) -> Result<(), Box<dyn Error>> {
        let conn = self.conn.lock().map_err(|e| format!("锁获取失败: {}", e))?;

        conn.execute(
            "INSERT INTO config_kv (scope_id, key, value, updated_at)
             VALUES ('global', ?1, ?2, datetime('now'))
             ON CONFLICT(scope_id, key) DO UPDATE SET value = ?2, updated_at = datetime('now')",
            params![key, value],
        )?;

        tracing::debug!(config_key = key, "配置已更新");
        Ok(())
    }

    /// 删除配置值
    ///
    /// # 返回
    /// - true: 已删除
    /// - false: 配置不存在
    pub fn delete_config_value(&self, key: &str) -> Result<bool, Box<dyn Error>> {
        let conn = self.conn.lock().map_err(|e| format!("锁获取失败: {}", e))?;

        let affected = conn.execute(
            "DELETE FROM config_kv WHERE scope_id = 'global' AND key = ?1",
            params![key],
        )?;
        Ok(affected > 0)
    }

    /// 列出 global scope 下的全部配置（按 key 排序）
    pub fn list_configs(&self) -> Result<Vec<ConfigEntry>, Box<dyn Error>> {
        let conn = self.conn.lock().map_err(|e| format!("锁获取失败: {}", e))?;

        let mut stmt = conn.prepare(
            "SELECT key, value, updated_at FROM config_kv WHERE scope_id = 'global' ORDER BY key",
        )?;
        let rows = stmt.query_map([], |row| {
            Ok(ConfigEntry {
                key: row.get(0)?,
                value: row.get(1)?,
                updated_at: row.get(2)?,
            })
        })?;

        let mut entries = Vec::new();
        for row in rows {
            entries.push(row?);
        }
        Ok(entries)
    }

    /// 读取配置值，带默认值
    fn get_config_or_default(&self, key: &str, default: &str) -> Result<String, Box<dyn Error>> {
        Ok(self.get_config_value(key)?.unwrap_or_else(|| default.to_string()))
    }

    /// 读取并解析数值配置；格式错误或非有限值时告警并回退默认值
    fn get_parsed_or_default<T>(&self, key: &str, default: T) -> Result<T, Box<dyn Error>>
    where
        T: FromStr + Copy + std::fmt::Display,
    {
        let raw = match self.get_config_value(key)? {
            None => return Ok(default),
            Some(raw) => raw,
        };

        let parsed = validate_config_value(key, &raw)
            .ok()
            .and_then(|_| raw.trim().parse::<T>().ok());
        match parsed {
            Some(v) => Ok(v),
            None => {
                tracing::warn!(
                    config_key = key,
                    raw_value = %raw,
                    default = %default,
                    "配置值格式错误，使用默认值"
                );
                Ok(default)
            }
        }
    }

    /// 当前生效的偏差阈值 (major, critical)
    pub fn effective_thresholds(&self) -> Result<(f64, f64), Box<dyn Error>> {
        Ok((
            self.get_parsed_or_default(
                config_keys::MAJOR_DELTA_THRESHOLD_MIN,
                DEFAULT_MAJOR_DELTA_THRESHOLD_MIN,
            )?,
            self.get_parsed_or_default(
                config_keys::CRITICAL_DELTA_THRESHOLD_MIN,
                DEFAULT_CRITICAL_DELTA_THRESHOLD_MIN,
            )?,
        ))
    }

    /// 获取所有配置的快照（JSON格式）
    ///
    /// # 注意
    /// - 快照不包含 API 密钥
    pub fn get_config_snapshot(&self) -> Result<String, Box<dyn Error>> {
        let config_map: BTreeMap<String, String> = self
            .list_configs()?
            .into_iter()
            .filter(|entry| entry.key != config_keys::ASSISTANT_API_KEY)
            .map(|entry| (entry.key, entry.value))
            .collect();

        Ok(serde_json::to_string(&json!(config_map))?)
    }

    /// 从配置快照恢复配置
    ///
    /// # 返回
    /// - Ok(usize): 恢复的配置项数量
    ///
    /// # 注意
    /// - 覆盖同名 global 配置；快照外的配置保持不变
    pub fn restore_config_from_snapshot(&self, snapshot_json: &str) -> Result<usize, Box<dyn Error>> {
        let config_map: BTreeMap<String, String> = serde_json::from_str(snapshot_json)?;

        // 整份快照先校验，任何一项不合法都不写入
        for (key, value) in config_map.iter() {
            if key.starts_with("__meta_") {
                continue;
            }
            validate_config_value(key, value)?;
        }
        let (current_major, current_critical) = self.effective_thresholds()?;
        let threshold = |key: &str, current: f64| {
            config_map
                .get(key)
                .and_then(|v| v.trim().parse::<f64>().ok())
                .unwrap_or(current)
        };
        check_threshold_order(
            threshold(config_keys::MAJOR_DELTA_THRESHOLD_MIN, current_major),
            threshold(config_keys::CRITICAL_DELTA_THRESHOLD_MIN, current_critical),
        )?;

        let mut conn = self.conn.lock().map_err(|e| format!("锁获取失败: {}", e))?;
        let tx = conn.transaction()?;

        let mut count = 0;
        for (key, value) in config_map.iter() {
            if key.starts_with("__meta_") {
                continue;
            }
            count += tx.execute(
                "INSERT INTO config_kv (scope_id, key, value, updated_at)
                 VALUES ('global', ?1, ?2, datetime('now'))
                 ON CONFLICT(scope_id, key) DO UPDATE SET value = ?2, updated_at = datetime('now')",
                params![key, value],
            )?;
        }

        tx.commit()?;
        Ok(count)
    }
}

// ==========================================
// DashboardConfigReader Trait 实现
// ==========================================
#[async_trait]
impl DashboardConfigReader for ConfigManager {
    // ===== 偏差阈值 =====

    async fn get_major_delta_threshold(&self) -> Result<f64, Box<dyn Error>> {
        self.get_parsed_or_default(
            config_keys::MAJOR_DELTA_THRESHOLD_MIN,
            DEFAULT_MAJOR_DELTA_THRESHOLD_MIN,
        )
    }

    async fn get_critical_delta_threshold(&self) -> Result<f64, Box<dyn Error>> {
        self.get_parsed_or_default(
            config_keys::CRITICAL_DELTA_THRESHOLD_MIN,
            DEFAULT_CRITICAL_DELTA_THRESHOLD_MIN,
        )
    }

    // ===== 成本 =====

    async fn get_piece_unit_cost(&self) -> Result<f64, Box<dyn Error>> {
        self.get_parsed_or_default(config_keys::PIECE_UNIT_COST, DEFAULT_PIECE_UNIT_COST)
    }

    async fn get_hourly_gross_rate(&self) -> Result<f64, Box<dyn Error>> {
        self.get_parsed_or_default(config_keys::HOURLY_GROSS_RATE, DEFAULT_HOURLY_GROSS_RATE)
    }

    // ===== WIP 指数 =====

    async fn get_wip_index_baseline(&self) -> Result<i64, Box<dyn Error>> {
        self.get_parsed_or_default(config_keys::WIP_INDEX_BASELINE, DEFAULT_WIP_INDEX_BASELINE)
    }

    async fn get_wip_index_scenario(&self) -> Result<i64, Box<dyn Error>> {
        self.get_parsed_or_default(config_keys::WIP_INDEX_SCENARIO, DEFAULT_WIP_INDEX_SCENARIO)
    }

    // ===== 排名 =====

    async fn get_top_bottleneck_count(&self) -> Result<usize, Box<dyn Error>> {
        self.get_parsed_or_default(
            config_keys::TOP_BOTTLENECK_COUNT,
            DEFAULT_TOP_BOTTLENECK_COUNT,
        )
    }

    // ===== 对话助手 =====

    async fn get_assistant_api_key(&self) -> Result<Option<String>, Box<dyn Error>> {
        Ok(self
            .get_config_value(config_keys::ASSISTANT_API_KEY)?
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty()))
    }

    async fn get_assistant_model(&self) -> Result<String, Box<dyn Error>> {
        self.get_config_or_default(config_keys::ASSISTANT_MODEL, defaults::ASSISTANT_MODEL)
    }

    async fn get_assistant_base_url(&self) -> Result<String, Box<dyn Error>> {
        self.get_config_or_default(config_keys::ASSISTANT_BASE_URL, defaults::ASSISTANT_BASE_URL)
    }

    async fn get_locale(&self) -> Result<String, Box<dyn Error>> {
        self.get_config_or_default(config_keys::LOCALE, defaults::LOCALE)
    }
}

// ==========================================
// 配置键常量
// ==========================================
pub mod config_keys {
    // 偏差阈值
    pub const MAJOR_DELTA_THRESHOLD_MIN: &str = "major_delta_threshold_min";
    pub const CRITICAL_DELTA_THRESHOLD_MIN: &str = "critical_delta_threshold_min";

    // 成本
    pub const PIECE_UNIT_COST: &str = "piece_unit_cost";
    pub const HOURLY_GROSS_RATE: &str = "hourly_gross_rate";

    // WIP 指数
    pub const WIP_INDEX_BASELINE: &str = "wip_index_baseline";
    pub const WIP_INDEX_SCENARIO: &str = "wip_index_scenario";

    // 排名
    pub const TOP_BOTTLENECK_COUNT: &str = "top_bottleneck_count";

    // 对话助手
    pub const ASSISTANT_API_KEY: &str = "assistant_api_key";
    pub const ASSISTANT_MODEL: &str = "assistant_model";
    pub const ASSISTANT_BASE_URL: &str = "assistant_base_url";

    // 语言
    pub const LOCALE: &str = "locale";

    /// 非负有限浮点数
    pub const FLOAT_KEYS: &[&str] = &[
        MAJOR_DELTA_THRESHOLD_MIN,
        CRITICAL_DELTA_THRESHOLD_MIN,
        PIECE_UNIT_COST,
        HOURLY_GROSS_RATE,
    ];

    /// 整数 (i64)
    pub const INTEGER_KEYS: &[&str] = &[WIP_INDEX_BASELINE, WIP_INDEX_SCENARIO];

    /// 非负整数 (usize)
    pub const COUNT_KEYS: &[&str] = &[TOP_BOTTLENECK_COUNT];
}

// ==========================================
// 配置值校验
// ==========================================

/// 按键的类型校验配置值；非数值键不做限制
///
/// - 浮点键: 有限且不小于 0（拒绝 NaN / inf）
/// - 整数键: 必须是 i64 字面量（拒绝 "2.5"、"1e4"）
/// - 计数键: 必须是 usize 字面量（另拒绝 "-1"）
pub fn validate_config_value(key: &str, raw: &str) -> Result<(), String> {
    let value = raw.trim();
    let valid = if config_keys::FLOAT_KEYS.contains(&key) {
        matches!(value.parse::<f64>(), Ok(v) if v.is_finite() && v >= 0.0)
    } else if config_keys::INTEGER_KEYS.contains(&key) {
        value.parse::<i64>().is_ok()
    } else if config_keys::COUNT_KEYS.contains(&key) {
        value.parse::<usize>().is_ok()
    } else {
        true
    };

    if valid {
        Ok(())
    } else {
        Err(format!("配置 {} 的值不合法: {:?}", key, raw))
    }
}

/// critical 阈值不得低于 major 阈值
pub fn check_threshold_order(major: f64, critical: f64) -> Result<(), String> {
    if critical < major {
        return Err(format!(
            "critical 阈值 ({}) 不能小于 major 阈值 ({})",
            critical, major
        ));
    }
    Ok(())
}

/// 字符串类配置的缺省值
pub mod defaults {
    pub const ASSISTANT_MODEL: &str = "mistral-small-latest";
    pub const ASSISTANT_BASE_URL: &str = "https://api.mistral.ai/v1";
    pub const LOCALE: &str = "fr";
}

#[cfg(test)]
mod tests {
    use super::*;

    fn memory_manager() -> ConfigManager {
        ConfigManager::new(":memory:").unwrap()
    }

    #[tokio::test]
    async fn test_defaults_when_table_empty() {
        let manager = memory_manager();

        assert_eq!(manager.get_major_delta_threshold().await.unwrap(), 5.0);
        assert_eq!(manager.get_critical_delta_threshold().await.unwrap(), 10.0);
        assert_eq!(manager.get_piece_unit_cost().await.unwrap(), 50_000.0);
        assert_eq!(manager.get_wip_index_baseline().await.unwrap(), 18_400);
        assert_eq!(manager.get_wip_index_scenario().await.unwrap(), 15_200);
        assert_eq!(manager.get_top_bottleneck_count().await.unwrap(), 3);
        assert_eq!(manager.get_assistant_api_key().await.unwrap(), None);
        assert_eq!(manager.get_locale().await.unwrap(), "fr");
    }

    #[tokio::test]
    async fn test_set_and_read_back() {
        let manager = memory_manager();
        manager
            .set_config_value(config_keys::PIECE_UNIT_COST, "1200")
            .unwrap();
        manager
            .set_config_value(config_keys::PIECE_UNIT_COST, "1500")
            .unwrap();

        assert_eq!(manager.get_piece_unit_cost().await.unwrap(), 1500.0);
        assert_eq!(manager.list_configs().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_malformed_value_falls_back_to_default() {
        let manager = memory_manager();
        manager
            .set_config_value(config_keys::TOP_BOTTLENECK_COUNT, "trois")
            .unwrap();

        assert_eq!(manager.get_top_bottleneck_count().await.unwrap(), 3);
    }

    #[tokio::test]
    async fn test_non_finite_threshold_falls_back_to_default() {
        let manager = memory_manager();
        manager
            .set_config_value(config_keys::MAJOR_DELTA_THRESHOLD_MIN, "NaN")
            .unwrap();
        manager
            .set_config_value(config_keys::CRITICAL_DELTA_THRESHOLD_MIN, "inf")
            .unwrap();
        manager
            .set_config_value(config_keys::PIECE_UNIT_COST, "-5")
            .unwrap();

        assert_eq!(manager.get_major_delta_threshold().await.unwrap(), 5.0);
        assert_eq!(manager.get_critical_delta_threshold().await.unwrap(), 10.0);
        assert_eq!(manager.get_piece_unit_cost().await.unwrap(), 50_000.0);
    }

    #[tokio::test]
    async fn test_integer_keys_reject_fractional_forms() {
        let manager = memory_manager();
        manager
            .set_config_value(config_keys::WIP_INDEX_BASELINE, "1e4")
            .unwrap();
        manager
            .set_config_value(config_keys::TOP_BOTTLENECK_COUNT, "-1")
            .unwrap();

        assert_eq!(manager.get_wip_index_baseline().await.unwrap(), 18_400);
        assert_eq!(manager.get_top_bottleneck_count().await.unwrap(), 3);
    }

    #[test]
    fn test_validate_config_value_by_key_type() {
        assert!(validate_config_value(config_keys::HOURLY_GROSS_RATE, " 38.53 ").is_ok());
        assert!(validate_config_value(config_keys::HOURLY_GROSS_RATE, "NaN").is_err());
        assert!(validate_config_value(config_keys::WIP_INDEX_SCENARIO, "-200").is_ok());
        assert!(validate_config_value(config_keys::WIP_INDEX_SCENARIO, "2.5").is_err());
        assert!(validate_config_value(config_keys::TOP_BOTTLENECK_COUNT, "4").is_ok());
        assert!(validate_config_value(config_keys::TOP_BOTTLENECK_COUNT, "2.5").is_err());
        assert!(validate_config_value(config_keys::LOCALE, "NaN").is_ok());
    }

    #[test]
    fn test_restore_rejects_invalid_entry_atomically() {
        let manager = memory_manager();
        manager.set_config_value(config_keys::LOCALE, "fr").unwrap();

        let result = manager.restore_config_from_snapshot(
            r#"{"locale":"en","major_delta_threshold_min":"NaN"}"#,
        );

        assert!(result.is_err());
        assert_eq!(
            manager.get_config_value(config_keys::LOCALE).unwrap(),
            Some("fr".to_string())
        );
        assert_eq!(
            manager
                .get_config_value(config_keys::MAJOR_DELTA_THRESHOLD_MIN)
                .unwrap(),
            None
        );
    }

    #[test]
    fn test_restore_rejects_inverted_thresholds() {
        let manager = memory_manager();

        let result = manager.restore_config_from_snapshot(
            r#"{"major_delta_threshold_min":"15","critical_delta_threshold_min":"8"}"#,
        );
        assert!(result.is_err());

        let restored = manager
            .restore_config_from_snapshot(r#"{"major_delta_threshold_min":"8"}"#)
            .unwrap();
        assert_eq!(restored, 1);
    }

    #[tokio::test]
    async fn test_blank_api_key_is_none() {
        let manager = memory_manager();
        manager
            .set_config_value(config_keys::ASSISTANT_API_KEY, "   ")
            .unwrap();
        assert_eq!(manager.get_assistant_api_key().await.unwrap(), None);

        manager
            .set_config_value(config_keys::ASSISTANT_API_KEY, " sk-test ")
            .unwrap();
        assert_eq!(
            manager.get_assistant_api_key().await.unwrap(),
            Some("sk-test".to_string())
        );
    }

    #[test]
    fn test_delete_config_value() {
        let manager = memory_manager();
        manager.set_config_value(config_keys::LOCALE, "en").unwrap();

        assert!(manager.delete_config_value(config_keys::LOCALE).unwrap());
        assert!(!manager.delete_config_value(config_keys::LOCALE).unwrap());
        assert_eq!(manager.get_config_value(config_keys::LOCALE).unwrap(), None);
    }

    #[test]
    fn test_snapshot_excludes_api_key_and_restores() {
        let source = memory_manager();
        source.set_config_value(config_keys::LOCALE, "en").unwrap();
        source
            .set_config_value(config_keys::ASSISTANT_API_KEY, "secret")
            .unwrap();

        let snapshot = source.get_config_snapshot().unwrap();
        assert!(!snapshot.contains("secret"));

        let target = memory_manager();
        let restored = target.restore_config_from_snapshot(&snapshot).unwrap();
        assert_eq!(restored, 1);
        assert_eq!(
            target.get_config_value(config_keys::LOCALE).unwrap(),
            Some("en".to_string())
        );
    }
}
