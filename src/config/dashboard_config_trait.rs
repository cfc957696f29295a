// ==========================================
// 生产流程看板 - 看板配置读取 Trait
// ==========================================
// 职责: 定义聚合与助手所需的配置读取接口（不包含实现）
// 红线: 不包含配置写入、不包含业务逻辑
// ==========================================

use async_trait::async_trait;
use std::error::Error;

// ==========================================
// DashboardConfigReader Trait
// ==========================================
// 实现者: ConfigManager（从 config_kv 表读取）
#[async_trait]
pub trait DashboardConfigReader: Send + Sync {
    // ===== 偏差阈值 =====

    /// 主要偏差阈值（分钟）
    ///
    /// # 默认值
    /// - 5.0
    ///
    /// # 用途
    /// - 偏差 > 该值: 严重度至少为 Majeure，并生成问题记录
    async fn get_major_delta_threshold(&self) -> Result<f64, Box<dyn Error>>;

    /// 严重偏差阈值（分钟）
    ///
    /// # 默认值
    /// - 10.0
    ///
    /// # 用途
    /// - 偏差 > 该值: 严重度 Critique，问题标签 bottleneck
    async fn get_critical_delta_threshold(&self) -> Result<f64, Box<dyn Error>>;

    // ===== 成本 =====

    /// 单件成本（默认 50000）
    async fn get_piece_unit_cost(&self) -> Result<f64, Box<dyn Error>>;

    /// 小时毛工资（默认 38.53）
    async fn get_hourly_gross_rate(&self) -> Result<f64, Box<dyn Error>>;

    // ===== WIP 指数（占位常量） =====

    async fn get_wip_index_baseline(&self) -> Result<i64, Box<dyn Error>>;

    async fn get_wip_index_scenario(&self) -> Result<i64, Box<dyn Error>>;

    // ===== 排名 =====

    /// 瓶颈工序排名数量（默认 3）
    async fn get_top_bottleneck_count(&self) -> Result<usize, Box<dyn Error>>;

    // ===== 对话助手 =====

    /// API 密钥（未配置返回 None）
    async fn get_assistant_api_key(&self) -> Result<Option<String>, Box<dyn Error>>;

    /// 模型名称（默认 mistral-small-latest）
    async fn get_assistant_model(&self) -> Result<String, Box<dyn Error>>;

    /// 接口基地址（默认 https://api.mistral.ai/v1）
    async fn get_assistant_base_url(&self) -> Result<String, Box<dyn Error>>;

    /// 上下文语言（默认 fr）
    async fn get_locale(&self) -> Result<String, Box<dyn Error>>;
}
