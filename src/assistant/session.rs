// ==========================================
// 生产流程看板 - 助手会话
// ==========================================
// 职责: 维护对话历史，组装发送给模型的消息窗口
// 窗口: [system(含上下文), 最近 5 条历史, 新的用户消息]
// ==========================================

use crate::i18n::{t_in, t_with_args};
use serde::{Deserialize, Serialize};

/// 请求中携带的历史消息条数
pub const HISTORY_WINDOW: usize = 5;

/// 推荐问题（交互提示用）
pub const SUGGESTED_QUESTIONS: [&str; 4] = [
    "Quels sont les principaux goulets d'étranglement?",
    "Résume les KPIs les plus critiques",
    "Quelles actions recommandes-tu pour améliorer le lead time?",
    "Analyse les issues les plus urgentes",
];

/// 按编号（从 1 开始）取推荐问题
pub fn suggested_question(number: usize) -> Option<&'static str> {
    number
        .checked_sub(1)
        .and_then(|idx| SUGGESTED_QUESTIONS.get(idx))
        .copied()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChatRole {
    System,
    User,
    Assistant,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: ChatRole,
    pub content: String,
}

impl ChatMessage {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: ChatRole::System,
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: ChatRole::User,
            content: content.into(),
        }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: ChatRole::Assistant,
            content: content.into(),
        }
    }
}

// ==========================================
// ChatSession
// ==========================================
#[derive(Debug, Clone)]
pub struct ChatSession {
    locale: String,
    history: Vec<ChatMessage>,
}

impl ChatSession {
    /// 新会话以问候语开头
    pub fn new(locale: &str) -> Self {
        Self {
            locale: locale.to_string(),
            history: vec![ChatMessage::assistant(t_in(locale, "assistant.greeting"))],
        }
    }

    pub fn locale(&self) -> &str {
        &self.locale
    }

    pub fn history(&self) -> &[ChatMessage] {
        &self.history
    }

    pub fn system_prompt(&self, context: &str) -> String {
        t_with_args(&self.locale, "assistant.system_prompt", &[("context", context)])
    }

    /// 组装请求消息（不修改历史）
    pub fn request_messages(&self, context: &str, question: &str) -> Vec<ChatMessage> {
        let window_start = self.history.len().saturating_sub(HISTORY_WINDOW);

        let mut messages = Vec::with_capacity(HISTORY_WINDOW + 2);
        messages.push(ChatMessage::system(self.system_prompt(context)));
        messages.extend(self.history[window_start..].iter().cloned());
        messages.push(ChatMessage::user(question));
        messages
    }

    /// 记录一轮问答
    pub fn record_exchange(&mut self, question: &str, answer: &str) {
        self.history.push(ChatMessage::user(question));
        self.history.push(ChatMessage::assistant(answer));
    }

    /// 记录失败的一轮（问题保留，回答为错误说明）
    pub fn record_failure(&mut self, question: &str, error: &str) {
        self.history.push(ChatMessage::user(question));
        self.history
            .push(ChatMessage::assistant(format!("❌ {}", error)));
    }

    /// 清空历史，仅保留问候语
    pub fn reset(&mut self) {
        *self = Self::new(&self.locale.clone());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_session_starts_with_greeting() {
        let session = ChatSession::new("fr");

        assert_eq!(session.history().len(), 1);
        assert_eq!(session.history()[0].role, ChatRole::Assistant);
        assert!(session.history()[0].content.starts_with("Bonjour!"));
    }

    #[test]
    fn test_request_window_keeps_last_five() {
        let mut session = ChatSession::new("fr");
        for i in 0..4 {
            session.record_exchange(&format!("q{}", i), &format!("a{}", i));
        }
        // 历史 = 问候 + 8 条

        let messages = session.request_messages("CTX", "nouvelle question");

        assert_eq!(messages.len(), 7);
        assert_eq!(messages[0].role, ChatRole::System);
        assert!(messages[0].content.contains("\n\nCTX\n\n"));
        assert_eq!(messages[1], ChatMessage::assistant("a1"));
        assert_eq!(messages[5], ChatMessage::assistant("a3"));
        assert_eq!(messages[6], ChatMessage::user("nouvelle question"));
    }

    #[test]
    fn test_short_history_is_sent_whole() {
        let session = ChatSession::new("en");
        let messages = session.request_messages("CTX", "hello");

        assert_eq!(messages.len(), 3);
        assert_eq!(messages[1].role, ChatRole::Assistant);
    }

    #[test]
    fn test_reset() {
        let mut session = ChatSession::new("fr");
        session.record_failure("q", "timeout");
        assert_eq!(session.history().len(), 3);

        session.reset();
        assert_eq!(session.history().len(), 1);
    }

    #[test]
    fn test_suggested_question_by_number() {
        assert_eq!(suggested_question(1), Some(SUGGESTED_QUESTIONS[0]));
        assert_eq!(suggested_question(4), Some(SUGGESTED_QUESTIONS[3]));
        assert_eq!(suggested_question(0), None);
        assert_eq!(suggested_question(5), None);
    }

    #[test]
    fn test_role_serialization() {
        let json = serde_json::to_string(&ChatMessage::user("x")).unwrap();
        assert_eq!(json, r#"{"role":"user","content":"x"}"#);
    }
}
