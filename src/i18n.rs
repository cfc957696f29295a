// ==========================================
// 国际化 (i18n) 模块
// ==========================================
// 使用 rust-i18n 库
// 支持法语（默认）、英文、中文
// ==========================================
// 注意: rust_i18n::i18n! 宏已在 lib.rs 中初始化
// 说明: 助手上下文按调用方传入的 locale 翻译，不修改全局语言
// ==========================================

/// 默认语言
pub const DEFAULT_LOCALE: &str = "fr";

/// 支持的语言
pub const SUPPORTED_LOCALES: [&str; 3] = ["fr", "en", "zh-CN"];

/// 获取当前语言
pub fn current_locale() -> String {
    rust_i18n::locale().to_string()
}

/// 设置全局语言（CLI 启动时调用一次）
///
/// # 参数
/// - locale: 语言代码（"fr" / "en" / "zh-CN"）
pub fn set_locale(locale: &str) {
    rust_i18n::set_locale(normalize_locale(locale));
}

/// 未知语言退回默认语言
pub fn normalize_locale(locale: &str) -> &'static str {
    SUPPORTED_LOCALES
        .iter()
        .find(|l| l.eq_ignore_ascii_case(locale))
        .copied()
        .unwrap_or(DEFAULT_LOCALE)
}

/// 翻译消息（指定语言）
///
/// # 示例
/// ```no_run
/// use production_flow::i18n::t_in;
/// let msg = t_in("en", "context.header");
/// ```
pub fn t_in(locale: &str, key: &str) -> String {
    rust_i18n::t!(key, locale = normalize_locale(locale)).to_string()
}

/// 翻译消息（指定语言，带参数）
///
/// # 示例
/// ```no_run
/// use production_flow::i18n::t_with_args;
/// let msg = t_with_args("fr", "context.more_issues", &[("count", "3")]);
/// ```
pub fn t_with_args(locale: &str, key: &str, args: &[(&str, &str)]) -> String {
    let mut result = t_in(locale, key);
    for (k, v) in args {
        let placeholder = format!("%{{{}}}", k);
        result = result.replace(&placeholder, v);
    }
    result
}
