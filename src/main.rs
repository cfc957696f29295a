// ==========================================
// 生产流程看板 - 命令行入口
// ==========================================
// 命令:
// - import   导入表格，输出汇总，可导出 JSON 目录
// - context  输出助手上下文文本
// - ask      导入后向分析助手提问
// - chat     导入后与分析助手交互对话
// - config   配置查询与维护
// ==========================================

use std::io::Write;
use std::path::PathBuf;

use anyhow::{anyhow, Context, Result};
use clap::{Parser, Subcommand};
use serde_json::json;
use tokio::io::{AsyncBufReadExt, BufReader};

use production_flow::app::{get_default_db_path, AppState};
use production_flow::assistant::build_context;
use production_flow::config::DashboardConfigReader;
use production_flow::i18n::{self, normalize_locale};
use production_flow::logging;
use production_flow::ApiError;

#[derive(Parser, Debug)]
#[command(name = "production-flow", version)]
#[command(about = "Production flow dashboard: station KPIs, bottlenecks and issues from spreadsheets")]
struct Cli {
    /// 配置数据库路径
    #[arg(long, env = "PRODUCTION_FLOW_DB_PATH", value_name = "PATH")]
    db: Option<String>,

    /// 以 JSON 行输出日志
    #[arg(long)]
    log_json: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// 导入表格文件
    Import {
        file: PathBuf,

        /// 导出 graph/kpis/issues/analytics JSON 的目录
        #[arg(long, value_name = "DIR")]
        out: Option<PathBuf>,

        /// 格式化 JSON 输出
        #[arg(long)]
        pretty: bool,
    },

    /// 输出助手上下文文本
    Context {
        file: PathBuf,

        /// 缺省取配置中的 locale
        #[arg(long)]
        locale: Option<String>,
    },

    /// 导入后向分析助手提问
    Ask { file: PathBuf, question: String },

    /// 导入后与分析助手交互对话（/suggestions /reset /quit）
    Chat { file: PathBuf },

    /// 配置管理
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand, Debug)]
enum ConfigAction {
    List,
    Get { key: String },
    Set { key: String, value: String },
    SetApiKey { key: String },
    ClearApiKey,
    /// 输出配置快照 JSON（不含 API 密钥）
    Snapshot,
    /// 从快照 JSON 文件恢复配置
    Restore { file: PathBuf },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    if cli.log_json {
        logging::init_json();
    } else {
        logging::init();
    }

    let db_path = cli.db.clone().unwrap_or_else(get_default_db_path);
    tracing::debug!("使用数据库: {}", db_path);
    let state = AppState::new(db_path).map_err(|e| anyhow!(e))?;

    let locale = state
        .config_manager
        .get_locale()
        .await
        .map_err(|e| anyhow!("读取语言配置失败: {}", e))?;
    i18n::set_locale(&locale);

    match cli.command {
        Command::Import { file, out, pretty } => {
            let snapshot = state
                .dashboard_api
                .import_file(&file)
                .await
                .with_context(|| format!("导入失败: {}", file.display()))?;

            let dashboard = &snapshot.dashboard;
            let summary = json!({
                "batch_id": snapshot.batch_id,
                "source_file": snapshot.source_file,
                "imported_at": snapshot.imported_at,
                "row_count": snapshot.row_count,
                "stations": dashboard.graph.detail.nodes.len(),
                "macro_stages": dashboard.graph.macro_layer.nodes.len(),
                "issues": dashboard.issues.len(),
                "kpis": dashboard.kpis,
            });
            print_json(&summary, pretty)?;

            if let Some(dir) = out {
                let written = state.dashboard_api.export_snapshot(&dir, pretty)?;
                for path in written {
                    eprintln!("{}", path.display());
                }
            }
        }
        Command::Context { file, locale } => {
            let snapshot = state.dashboard_api.import_file(&file).await?;
            let dashboard = &snapshot.dashboard;
            let locale = locale.unwrap_or_else(i18n::current_locale);
            let context = build_context(
                normalize_locale(&locale),
                Some(&dashboard.kpis),
                &dashboard.issues,
                Some(&dashboard.graph),
            );
            print!("{}", context);
        }
        Command::Ask { file, question } => {
            state.dashboard_api.import_file(&file).await?;
            let answer = state.assistant_api.ask(&question).await?;
            println!("{}", answer);
        }
        Command::Chat { file } => {
            state.dashboard_api.import_file(&file).await?;
            run_chat(&state).await?;
        }
        Command::Config { action } => run_config(&state, action)?,
    }

    Ok(())
}

fn run_config(state: &AppState, action: ConfigAction) -> Result<()> {
    let api = &state.config_api;
    match action {
        ConfigAction::List => {
            for entry in api.list_configs()? {
                println!("{} = {}", entry.key, entry.value);
            }
        }
        ConfigAction::Get { key } => match api.get_config(&key)? {
            Some(value) => println!("{}", value),
            None => return Err(anyhow!("配置不存在: {}", key)),
        },
        ConfigAction::Set { key, value } => api.update_config(&key, &value)?,
        ConfigAction::SetApiKey { key } => api.save_api_key(&key)?,
        ConfigAction::ClearApiKey => {
            if !api.clear_api_key()? {
                eprintln!("未配置 API 密钥");
            }
        }
        ConfigAction::Snapshot => println!("{}", api.get_config_snapshot()?),
        ConfigAction::Restore { file } => {
            let text = std::fs::read_to_string(&file)
                .with_context(|| format!("读取快照失败: {}", file.display()))?;
            let restored = api.restore_from_snapshot(&text)?;
            eprintln!("已恢复 {} 项配置", restored);
        }
    }
    Ok(())
}

async fn run_chat(state: &AppState) -> Result<()> {
    let assistant = &state.assistant_api;
    print_suggestions(assistant.suggested_questions());

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        eprint!("> ");
        std::io::stderr().flush()?;
        let Some(line) = lines.next_line().await? else {
            break;
        };

        match line.trim() {
            "" => continue,
            "/quit" | "/exit" => break,
            "/reset" => {
                assistant.reset_session()?;
                eprintln!("会话已重置");
            }
            "/suggestions" => print_suggestions(assistant.suggested_questions()),
            input => {
                let question = assistant.resolve_question(input);
                match assistant.ask(&question).await {
                    Ok(answer) => println!("{}\n", answer),
                    // 未配置密钥时继续对话没有意义
                    Err(e @ ApiError::AssistantNotConfigured(_)) => return Err(e.into()),
                    Err(e) => eprintln!("{}", e),
                }
            }
        }
    }
    Ok(())
}

fn print_suggestions(questions: &[&str]) {
    for (idx, question) in questions.iter().enumerate() {
        eprintln!("  {}. {}", idx + 1, question);
    }
}

fn print_json(value: &serde_json::Value, pretty: bool) -> Result<()> {
    let text = if pretty {
        serde_json::to_string_pretty(value)?
    } else {
        serde_json::to_string(value)?
    };
    println!("{}", text);
    Ok(())
}
