//! # CLI 模块
//!
//! 使用 `clap` 定义命令行参数和子命令。
//!
//! ## 命令结构
//! - `explain`: 获取条目并解释其能量修正
//! - `fetch`: 列出与化学式匹配的条目
//! - `correct`: 批量修正条目并汇总
//!
//! ## 依赖关系
//! - 被 `main.rs` 使用
//! - 子模块: explain, fetch, correct

pub mod correct;
pub mod explain;
pub mod fetch;

use clap::{ArgAction, Args, Parser, Subcommand};
use std::path::PathBuf;

/// mpcompat - 计算条目能量修正工具
#[derive(Parser)]
#[command(name = "mpcompat")]
#[command(author = "Changjiang Wu")]
#[command(version)]
#[command(about = "Fetch computed DFT entries and explain their energy corrections", long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress logs and progress output
    #[arg(short, long, default_value_t = false, global = true)]
    pub quiet: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// 可用的子命令
#[derive(Subcommand)]
pub enum Commands {
    /// Fetch entries for a formula and explain the corrections applied to one of them
    Explain(explain::ExplainArgs),

    /// List the computed entries matching a formula
    Fetch(fetch::FetchArgs),

    /// Apply the correction scheme to every entry matching a formula
    Correct(correct::CorrectArgs),
}

// ─────────────────────────────────────────────────────────────
// 共享参数
// ─────────────────────────────────────────────────────────────

/// 条目来源参数
#[derive(Args, Debug, Clone)]
pub struct SourceArgs {
    /// Read entries from a local JSON file or directory instead of the API
    #[arg(long)]
    pub entries: Option<PathBuf>,

    /// File name pattern when --entries is a directory
    #[arg(long, default_value = "*.json")]
    pub pattern: String,

    /// Materials Project API key
    #[arg(long, env = "MP_API_KEY", hide_env_values = true)]
    pub api_key: Option<String>,

    /// Materials Project API endpoint
    #[arg(long, env = "MP_API_ENDPOINT")]
    pub endpoint: Option<String>,
}

/// 修正方案参数
#[derive(Args, Debug, Clone)]
pub struct SchemeArgs {
    /// Correction scheme TOML file (default: built-in legacy MP scheme)
    #[arg(long)]
    pub scheme: Option<PathBuf>,
}
