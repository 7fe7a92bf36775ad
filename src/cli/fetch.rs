//! # fetch 子命令 CLI 定义
//!
//! ## 依赖关系
//! - 被 `cli/mod.rs` 使用
//! - 参数传递给 `commands/fetch.rs`

use super::SourceArgs;
use clap::Args;
use std::path::PathBuf;

/// fetch 子命令参数
#[derive(Args, Debug)]
pub struct FetchArgs {
    /// Chemical formula, e.g. Fe2O3
    pub formula: String,

    /// Also write the entry list to this CSV file
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    #[command(flatten)]
    pub source: SourceArgs,
}
