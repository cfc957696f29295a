// ==========================================
// 生产流程看板 - 分析助手
// ==========================================
// 职责: 看板数据 → 上下文文本 → 对话模型问答
// ==========================================

pub mod client;
pub mod context;
pub mod error;
pub mod session;

pub use client::{ChatClient, ChatClientConfig};
pub use context::build_context;
pub use error::{AssistantError, AssistantResult};
pub use session::{
    suggested_question, ChatMessage, ChatRole, ChatSession, SUGGESTED_QUESTIONS,
};
