// ==========================================
// 生产流程看板 - 助手 API
// ==========================================
// 职责: 以当前快照为上下文向对话模型提问，维护会话历史
// ==========================================

use std::sync::{Arc, Mutex};

use tracing::{info, warn};

use crate::api::dashboard_api::SnapshotStore;
use crate::api::error::{ApiError, ApiResult};
use crate::assistant::{
    build_context, suggested_question, AssistantError, ChatClient, ChatClientConfig, ChatMessage,
    ChatSession, SUGGESTED_QUESTIONS,
};
use crate::config::{ConfigManager, DashboardConfigReader};
use crate::i18n::normalize_locale;

pub struct AssistantApi {
    config_manager: Arc<ConfigManager>,
    store: Arc<SnapshotStore>,
    session: Mutex<ChatSession>,
}

impl AssistantApi {
    pub fn new(config_manager: Arc<ConfigManager>, store: Arc<SnapshotStore>, locale: &str) -> Self {
        Self {
            config_manager,
            store,
            session: Mutex::new(ChatSession::new(normalize_locale(locale))),
        }
    }

    fn with_session<T>(&self, f: impl FnOnce(&mut ChatSession) -> T) -> ApiResult<T> {
        let mut guard = self
            .session
            .lock()
            .map_err(|e| ApiError::InternalError(format!("会话锁获取失败: {}", e)))?;
        Ok(f(&mut guard))
    }

    /// 当前快照的上下文文本（无快照时只有标题）
    pub fn context_text(&self) -> ApiResult<String> {
        let locale = self.with_session(|s| s.locale().to_string())?;
        let snapshot = self.store.get()?;
        let dashboard = snapshot.as_ref().map(|s| &s.dashboard);

        Ok(build_context(
            &locale,
            dashboard.map(|d| &d.kpis),
            dashboard.map(|d| d.issues.as_slice()).unwrap_or(&[]),
            dashboard.map(|d| &d.graph),
        ))
    }

    pub fn history(&self) -> ApiResult<Vec<ChatMessage>> {
        self.with_session(|s| s.history().to_vec())
    }

    /// 清空会话历史（保留问候语）
    pub fn reset_session(&self) -> ApiResult<()> {
        self.with_session(|s| s.reset())?;
        info!("助手会话已重置");
        Ok(())
    }

    pub fn suggested_questions(&self) -> &'static [&'static str] {
        &SUGGESTED_QUESTIONS
    }

    /// 交互输入 → 问题文本；纯数字输入按编号取推荐问题
    pub fn resolve_question(&self, input: &str) -> String {
        let input = input.trim();
        input
            .parse::<usize>()
            .ok()
            .and_then(suggested_question)
            .unwrap_or(input)
            .to_string()
    }

    async fn client(&self) -> ApiResult<ChatClient> {
        let read_err = |e: Box<dyn std::error::Error>| ApiError::DatabaseError(e.to_string());
        let api_key = self
            .config_manager
            .get_assistant_api_key()
            .await
            .map_err(read_err)?;
        let model = self
            .config_manager
            .get_assistant_model()
            .await
            .map_err(read_err)?;
        let base_url = self
            .config_manager
            .get_assistant_base_url()
            .await
            .map_err(read_err)?;

        Ok(ChatClient::new(ChatClientConfig::new(&base_url, &model, api_key))?)
    }

    /// 提问
    ///
    /// # 说明
    /// - 空问题直接拒绝
    /// - 请求失败时问题与错误说明也写入历史
    pub async fn ask(&self, question: &str) -> ApiResult<String> {
        let question = question.trim();
        if question.is_empty() {
            return Err(AssistantError::EmptyQuestion.into());
        }

        let client = self.client().await?;
        let context = self.context_text()?;
        let messages = self.with_session(|s| s.request_messages(&context, question))?;

        match client.complete(&messages).await {
            Ok(answer) => {
                info!(question_len = question.len(), answer_len = answer.len(), "助手已回答");
                self.with_session(|s| s.record_exchange(question, &answer))?;
                Ok(answer)
            }
            Err(e) => {
                warn!(error = %e, "助手请求失败");
                self.with_session(|s| s.record_failure(question, &e.to_string()))?;
                Err(e.into())
            }
        }
    }
}
