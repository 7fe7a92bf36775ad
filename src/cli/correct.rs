//! # correct 子命令 CLI 定义
//!
//! ## 依赖关系
//! - 被 `cli/mod.rs` 使用
//! - 参数传递给 `commands/correct.rs`

use super::{SchemeArgs, SourceArgs};
use clap::Args;
use std::path::PathBuf;

/// correct 子命令参数
#[derive(Args, Debug)]
pub struct CorrectArgs {
    /// Chemical formula, e.g. Fe2O3
    pub formula: String,

    /// Write corrected energies to this CSV file
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Number of parallel jobs (0 = auto)
    #[arg(short, long, default_value_t = 0)]
    pub jobs: usize,

    #[command(flatten)]
    pub source: SourceArgs,

    #[command(flatten)]
    pub scheme: SchemeArgs,
}
