//! # 命令执行模块
//!
//! 实现各子命令的业务逻辑。
//!
//! ## 依赖关系
//! - 被 `main.rs` 调用
//! - 使用 `cli/`, `client/`, `compat/`, `models/`, `utils/`
//! - 子模块: explain, fetch, correct

pub mod correct;
pub mod explain;
pub mod fetch;

use crate::cli::{Commands, SourceArgs};
use crate::client::{EntrySource, LocalEntrySource, MpRestClient};
use crate::error::{MpCompatError, Result};
use crate::models::ComputedEntry;
use crate::utils::progress;

use tracing::info;

/// 执行命令
pub fn run(cmd: Commands, quiet: bool) -> Result<()> {
    match cmd {
        Commands::Explain(args) => explain::execute(args, quiet),
        Commands::Fetch(args) => fetch::execute(args, quiet),
        Commands::Correct(args) => correct::execute(args, quiet),
    }
}

/// 根据参数选择条目来源：指定 `--entries` 时读取本地文件，否则访问 API
pub fn open_source(args: &SourceArgs) -> Result<Box<dyn EntrySource>> {
    match &args.entries {
        Some(path) => Ok(Box::new(
            LocalEntrySource::new(path)?.with_pattern(&args.pattern)?,
        )),
        None => Ok(Box::new(MpRestClient::new(
            args.api_key.clone(),
            args.endpoint.clone(),
        )?)),
    }
}

/// 获取条目；无匹配时返回 `NoEntries`
pub fn fetch_entries(
    source: &dyn EntrySource,
    formula: &str,
    quiet: bool,
) -> Result<Vec<ComputedEntry>> {
    info!("Querying {} for {}", source.describe(), formula);

    let spinner = if quiet {
        progress::hidden()
    } else {
        progress::create_spinner(&format!("Fetching entries for {}", formula))
    };
    let result = source.get_entries(formula);
    spinner.finish_and_clear();

    let entries = result?;
    if entries.is_empty() {
        return Err(MpCompatError::NoEntries {
            formula: formula.to_string(),
        });
    }
    info!("Retrieved {} entries", entries.len());
    Ok(entries)
}
