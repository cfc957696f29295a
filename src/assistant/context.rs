// ==========================================
// 生产流程看板 - 助手上下文构建
// ==========================================
// 职责: 全局 KPI / 问题 / 流程图 → 系统提示中的文本块
// 规则:
// - 问题最多列出 5 条，工位最多列出 10 个，其余以 "... N" 汇总
// - 缺失的输入对应的段落整体省略
// ==========================================

use crate::domain::graph::FlowGraph;
use crate::domain::issue::IssueRecord;
use crate::domain::kpi::GlobalKpiSummary;
use crate::i18n::{t_in, t_with_args};
use std::fmt::Write;

/// 上下文中列出的问题条数
pub const MAX_CONTEXT_ISSUES: usize = 5;

/// 上下文中列出的工位数
pub const MAX_CONTEXT_STATIONS: usize = 10;

pub fn build_context(
    locale: &str,
    kpis: Option<&GlobalKpiSummary>,
    issues: &[IssueRecord],
    graph: Option<&FlowGraph>,
) -> String {
    let mut context = format!("{}\n\n", t_in(locale, "context.header"));

    if let Some(kpis) = kpis {
        write_kpis(&mut context, locale, kpis);
    }
    if !issues.is_empty() {
        write_issues(&mut context, locale, issues);
    }
    if let Some(graph) = graph {
        write_graph(&mut context, locale, graph);
    }

    context
}

// String 的 fmt::Write 不会失败，忽略返回值
fn write_kpis(out: &mut String, locale: &str, kpis: &GlobalKpiSummary) {
    let _ = writeln!(out, "{}", t_in(locale, "context.kpis"));
    let lines = [
        ("context.leadtime_planned", kpis.leadtime_planned_minutes, " min"),
        ("context.leadtime_actual", kpis.leadtime_actual_minutes, " min"),
        ("context.leadtime_delta", kpis.delta_leadtime_minutes, " min"),
        ("context.wip_baseline", kpis.wip_index_baseline, ""),
        ("context.wip_scenario", kpis.wip_index_scenario, ""),
        ("context.wip_delta", kpis.delta_wip_index, ""),
    ];
    for (key, value, unit) in lines {
        let _ = writeln!(out, "- {}: {}{}", t_in(locale, key), value, unit);
    }
    out.push('\n');

    let _ = writeln!(out, "{}", t_in(locale, "context.bottlenecks"));
    for (idx, bottleneck) in kpis.top_macro_bottlenecks.iter().enumerate() {
        let _ = writeln!(
            out,
            "{}. {}: +{} min",
            idx + 1,
            bottleneck.macro_stage,
            bottleneck.delta_total_minutes
        );
    }
    out.push('\n');
}

fn write_issues(out: &mut String, locale: &str, issues: &[IssueRecord]) {
    let count = issues.len().to_string();
    let _ = writeln!(
        out,
        "{}",
        t_with_args(locale, "context.issues_header", &[("count", &count)])
    );

    let delta_label = t_in(locale, "context.issue_delta");
    let severity_label = t_in(locale, "context.issue_severity");
    let pieces_label = t_in(locale, "context.issue_pieces");

    for (idx, issue) in issues.iter().take(MAX_CONTEXT_ISSUES).enumerate() {
        let _ = writeln!(out, "{}. {} ({}):", idx + 1, issue.station_id, issue.macro_stage);
        let _ = writeln!(out, "   - {}", issue.summary);
        let _ = writeln!(out, "   - {}: {:.1} min", delta_label, issue.delta_minutes);
        let _ = writeln!(out, "   - {}: {}", severity_label, issue.severity);
        let _ = writeln!(out, "   - {}: {}", pieces_label, issue.piece_count);
    }

    if issues.len() > MAX_CONTEXT_ISSUES {
        let rest = (issues.len() - MAX_CONTEXT_ISSUES).to_string();
        let _ = writeln!(
            out,
            "{}",
            t_with_args(locale, "context.more_issues", &[("count", &rest)])
        );
    }
    out.push('\n');
}

fn write_graph(out: &mut String, locale: &str, graph: &FlowGraph) {
    let macro_nodes = &graph.macro_layer.nodes;
    let macro_count = macro_nodes.len().to_string();
    let _ = writeln!(
        out,
        "{}",
        t_with_args(locale, "context.macro_header", &[("count", &macro_count)])
    );
    for node in macro_nodes {
        let _ = writeln!(
            out,
            "- {}: LT={:.1} min, Δ={:.1} min",
            node.label, node.kpi.leadtime_minutes, node.kpi.delta_minutes
        );
    }
    out.push('\n');

    let stations = &graph.detail.nodes;
    let station_count = stations.len().to_string();
    let _ = writeln!(
        out,
        "{}",
        t_with_args(locale, "context.stations_header", &[("count", &station_count)])
    );

    let planned_label = t_in(locale, "context.planned");
    let actual_label = t_in(locale, "context.actual");
    for node in stations.iter().take(MAX_CONTEXT_STATIONS) {
        let _ = writeln!(
            out,
            "- {} ({}): {}={:.1} min, {}={:.1} min, Δ={:.1} min",
            node.label,
            node.macro_stage,
            planned_label,
            node.kpi.planned_avg_minutes,
            actual_label,
            node.kpi.actual_avg_minutes,
            node.kpi.delta_minutes
        );
    }

    if stations.len() > MAX_CONTEXT_STATIONS {
        let rest = (stations.len() - MAX_CONTEXT_STATIONS).to_string();
        let _ = writeln!(
            out,
            "{}",
            t_with_args(locale, "context.more_stations", &[("count", &rest)])
        );
    }
}
