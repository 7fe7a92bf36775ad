//! # mpcompat - 计算条目能量修正工具
//!
//! 按化学式获取第一性原理计算条目（Materials Project API 或本地 JSON），
//! 应用兼容性修正方案，并打印逐条修正说明。
//!
//! ## 子命令
//! - `explain` - 获取条目并解释其能量修正
//! - `fetch`   - 列出匹配条目
//! - `correct` - 批量修正并汇总
//!
//! ## 依赖关系
//! ```text
//! main.rs
//!   ├── cli/        (命令行参数定义)
//!   ├── commands/   (命令执行逻辑)
//!   │     ├── client/    (条目获取)
//!   │     ├── compat/    (修正方案与说明)
//!   │     └── models/    (数据模型)
//!   ├── utils/      (输出、进度、日志)
//!   └── error.rs    (错误处理)
//! ```

mod cli;
mod client;
mod commands;
mod compat;
mod error;
mod models;
mod utils;

use clap::Parser;
use cli::Cli;

fn main() {
    // Initialize colored output for Windows compatibility
    #[cfg(windows)]
    colored::control::set_virtual_terminal(true).ok();

    let cli = Cli::parse();

    if let Err(e) = utils::logging::setup_logging(cli.verbose, cli.quiet) {
        utils::output::print_error(&format!("{}", e));
        std::process::exit(1);
    }

    if let Err(e) = commands::run(cli.command, cli.quiet) {
        utils::output::print_error(&format!("{}", e));
        std::process::exit(1);
    }
}
