// ==========================================
// 生产流程看板 - 配置管理 API
// ==========================================
// 职责: 配置查询、更新、快照管理、助手密钥维护
// ==========================================

use std::sync::Arc;

use tracing::info;

use crate::api::error::{ApiError, ApiResult};
use crate::config::config_manager::{check_threshold_order, validate_config_value};
use crate::config::{config_keys, ConfigEntry, ConfigManager};

/// 配置管理API
///
/// 职责：
/// 1. 配置查询（全部、单个）
/// 2. 配置更新（数值键做格式校验）
/// 3. 助手 API 密钥保存/清除
/// 4. 配置快照
pub struct ConfigApi {
    config_manager: Arc<ConfigManager>,
}

impl ConfigApi {
    pub fn new(config_manager: Arc<ConfigManager>) -> Self {
        Self { config_manager }
    }

    /// 查询所有配置（API 密钥值脱敏）
    pub fn list_configs(&self) -> ApiResult<Vec<ConfigEntry>> {
        let entries = self
            .config_manager
            .list_configs()
            .map_err(|e| ApiError::DatabaseError(e.to_string()))?;

        Ok(entries
            .into_iter()
            .map(|mut entry| {
                if entry.key == config_keys::ASSISTANT_API_KEY {
                    entry.value = mask_secret(&entry.value);
                }
                entry
            })
            .collect())
    }

    pub fn get_config(&self, key: &str) -> ApiResult<Option<String>> {
        let value = self
            .config_manager
            .get_config_value(key)
            .map_err(|e| ApiError::DatabaseError(e.to_string()))?;

        if key == config_keys::ASSISTANT_API_KEY {
            return Ok(value.map(|v| mask_secret(&v)));
        }
        Ok(value)
    }

    /// 更新配置
    ///
    /// # 校验
    /// - 键不能为空
    /// - 数值键按类型解析（浮点键有限且非负，整数键不接受小数或指数形式）
    /// - critical 阈值不得低于当前 major 阈值，反之亦然
    pub fn update_config(&self, key: &str, value: &str) -> ApiResult<()> {
        let key = key.trim();
        if key.is_empty() {
            return Err(ApiError::InvalidInput("配置键不能为空".to_string()));
        }

        let value = value.trim();
        validate_config_value(key, value).map_err(ApiError::InvalidInput)?;

        if key == config_keys::MAJOR_DELTA_THRESHOLD_MIN
            || key == config_keys::CRITICAL_DELTA_THRESHOLD_MIN
        {
            let (major, critical) = self
                .config_manager
                .effective_thresholds()
                .map_err(|e| ApiError::DatabaseError(e.to_string()))?;
            let parsed: f64 = value
                .parse()
                .map_err(|_| ApiError::InvalidInput(format!("配置 {} 需要数值", key)))?;
            let (major, critical) = if key == config_keys::MAJOR_DELTA_THRESHOLD_MIN {
                (parsed, critical)
            } else {
                (major, parsed)
            };
            check_threshold_order(major, critical).map_err(ApiError::InvalidInput)?;
        }

        self.config_manager
            .set_config_value(key, value)
            .map_err(|e| ApiError::DatabaseError(e.to_string()))?;
        info!(key = key, "配置已更新");
        Ok(())
    }

    pub fn save_api_key(&self, api_key: &str) -> ApiResult<()> {
        let api_key = api_key.trim();
        if api_key.is_empty() {
            return Err(ApiError::InvalidInput("API 密钥不能为空".to_string()));
        }
        self.config_manager
            .set_config_value(config_keys::ASSISTANT_API_KEY, api_key)
            .map_err(|e| ApiError::DatabaseError(e.to_string()))?;
        info!("助手 API 密钥已保存");
        Ok(())
    }

    /// 清除 API 密钥；返回是否存在过
    pub fn clear_api_key(&self) -> ApiResult<bool> {
        self.config_manager
            .delete_config_value(config_keys::ASSISTANT_API_KEY)
            .map_err(|e| ApiError::DatabaseError(e.to_string()))
    }

    pub fn get_config_snapshot(&self) -> ApiResult<String> {
        self.config_manager
            .get_config_snapshot()
            .map_err(|e| ApiError::DatabaseError(e.to_string()))
    }

    pub fn restore_from_snapshot(&self, snapshot_json: &str) -> ApiResult<usize> {
        // 先做 JSON 校验，区分格式错误与存储错误
        serde_json::from_str::<serde_json::Value>(snapshot_json)?;
        self.config_manager
            .restore_config_from_snapshot(snapshot_json)
            .map_err(|e| ApiError::InvalidInput(e.to_string()))
    }
}

/// 仅保留末 4 位
fn mask_secret(value: &str) -> String {
    let chars: Vec<char> = value.chars().collect();
    if chars.len() <= 4 {
        return "****".to_string();
    }
    let tail: String = chars[chars.len() - 4..].iter().collect();
    format!("****{}", tail)
}
