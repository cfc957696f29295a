// ==========================================
// 生产流程看板 - 助手模块错误类型
// ==========================================
// 工具: thiserror 派生宏
// ==========================================

use thiserror::Error;

#[derive(Error, Debug)]
pub enum AssistantError {
    #[error("未配置助手 API 密钥")]
    MissingApiKey,

    #[error("问题内容为空")]
    EmptyQuestion,

    #[error("HTTP 客户端配置失败: {0}")]
    ClientConfig(String),

    #[error("网络请求失败: {0}")]
    Network(String),

    #[error("助手服务返回错误 (HTTP {status}): {message}")]
    Api { status: u16, message: String },

    #[error("响应解析失败: {0}")]
    Decode(String),

    #[error("助手服务未返回任何回答")]
    EmptyResponse,
}

/// Result 类型别名
pub type AssistantResult<T> = Result<T, AssistantError>;
