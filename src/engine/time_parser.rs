// ==========================================
// 生产流程看板 - 时间解析器
// ==========================================
// 职责: 异构时间表示 → 分钟数
// 支持: 小数天（表格日期序列值） / HH:MM:SS 文本
// 红线: 不抛错，无法解析的部分按 0 处理
// ==========================================

/// 一天的分钟数
pub const MINUTES_PER_DAY: f64 = 24.0 * 60.0;

/// 将单元格时间值换算为分钟（非负）
///
/// # 规则
/// - 空 / 缺失 → 0
/// - 纯数字且不含冒号 → 小数天: value × 1440
/// - 其他 → 按 `:` 拆为 时:分:秒（缺省为 0），每段取前导整数
///
/// # 示例
/// ```
/// use production_flow::engine::time_parser::parse_time_to_minutes;
/// assert_eq!(parse_time_to_minutes(Some("1:30:00")), 90.0);
/// assert_eq!(parse_time_to_minutes(Some("0.5")), 720.0);
/// assert_eq!(parse_time_to_minutes(None), 0.0);
/// ```
pub fn parse_time_to_minutes(value: Option<&str>) -> f64 {
    let text = match value.map(str::trim) {
        Some(t) if !t.is_empty() => t,
        _ => return 0.0,
    };

    let minutes = if !text.contains(':') {
        match text.parse::<f64>() {
            Ok(days) => days * MINUTES_PER_DAY,
            // 非数字且无冒号: 整串视为"时"字段
            Err(_) => parse_clock_fields(text),
        }
    } else {
        parse_clock_fields(text)
    };

    if minutes.is_finite() && minutes > 0.0 {
        minutes
    } else {
        0.0
    }
}

/// 时:分:秒 → 分钟，多余的段忽略
fn parse_clock_fields(text: &str) -> f64 {
    let mut fields = text.split(':').map(lenient_int);
    let hours = fields.next().unwrap_or(0);
    let minutes = fields.next().unwrap_or(0);
    let seconds = fields.next().unwrap_or(0);

    hours as f64 * 60.0 + minutes as f64 + seconds as f64 / 60.0
}

/// 宽松整数解析: 可选正负号 + 前导数字，其余字符截断；无数字 → 0
///
/// 例: "12abc" → 12, " 07" → 7, "1.9" → 1, "abc" → 0
fn lenient_int(field: &str) -> i64 {
    let trimmed = field.trim_start();
    let (negative, digits) = match trimmed.as_bytes().first() {
        Some(b'-') => (true, &trimmed[1..]),
        Some(b'+') => (false, &trimmed[1..]),
        _ => (false, trimmed),
    };

    let end = digits
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(digits.len());

    match digits[..end].parse::<i64>() {
        Ok(v) if negative => -v,
        Ok(v) => v,
        Err(_) => 0,
    }
}
