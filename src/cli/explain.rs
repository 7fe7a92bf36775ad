//! # explain 子命令 CLI 定义
//!
//! 获取条目、选择其一并打印修正说明。
//!
//! ## 依赖关系
//! - 被 `cli/mod.rs` 使用
//! - 参数传递给 `commands/explain.rs`

use super::{SchemeArgs, SourceArgs};
use clap::Args;

/// explain 子命令参数
#[derive(Args, Debug)]
pub struct ExplainArgs {
    /// Chemical formula, e.g. LiFePO4
    pub formula: String,

    /// Index of the entry to explain (0 = first returned)
    #[arg(long, default_value_t = 0, conflicts_with = "entry_id")]
    pub index: usize,

    /// Explain the entry with this id instead of selecting by index
    #[arg(long)]
    pub entry_id: Option<String>,

    /// Print the explanation as JSON
    #[arg(long, default_value_t = false)]
    pub json: bool,

    #[command(flatten)]
    pub source: SourceArgs,

    #[command(flatten)]
    pub scheme: SchemeArgs,
}
