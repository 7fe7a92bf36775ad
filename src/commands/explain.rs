//! # explain 命令实现
//!
//! 获取与化学式匹配的条目，选择其一（默认第一个），用修正方案生成并打印说明。
//!
//! ## 依赖关系
//! - 使用 `cli/explain.rs` 定义的参数
//! - 使用 `client/`, `compat/`

use crate::cli::explain::ExplainArgs;
use crate::client::EntrySource;
use crate::compat::{Compatibility, Explanation, SchemeConfig};
use crate::error::{MpCompatError, Result};
use crate::models::ComputedEntry;

use tracing::{debug, info};

/// 条目选择方式
#[derive(Debug, Clone, PartialEq)]
pub enum Selection {
    Index(usize),
    EntryId(String),
}

impl Selection {
    fn from_args(args: &ExplainArgs) -> Self {
        match &args.entry_id {
            Some(id) => Selection::EntryId(id.clone()),
            None => Selection::Index(args.index),
        }
    }
}

/// 执行 explain 命令
pub fn execute(args: ExplainArgs, quiet: bool) -> Result<()> {
    let scheme = SchemeConfig::load(args.scheme.scheme.as_deref())?;
    let compat = Compatibility::from_scheme(&scheme);
    debug!("Rules: {}", compat.correction_names().join(", "));
    let source = super::open_source(&args.source)?;
    let selection = Selection::from_args(&args);

    let explanation = explain_formula(source.as_ref(), &compat, &args.formula, &selection, quiet)?;

    info!(
        "Total correction for {}: {:.6} eV",
        explanation.formula,
        explanation.total_correction()
    );

    if args.json {
        println!("{}", serde_json::to_string_pretty(&explanation)?);
    } else {
        print!("{}", explanation);
    }
    Ok(())
}

/// 获取条目、选择并生成说明
pub fn explain_formula(
    source: &dyn EntrySource,
    compat: &Compatibility,
    formula: &str,
    selection: &Selection,
    quiet: bool,
) -> Result<Explanation> {
    let entries = super::fetch_entries(source, formula, quiet)?;
    let entry = select_entry(&entries, selection)?;
    info!(
        "Explaining {} ({}) with {}",
        entry.display_id(),
        entry.composition.reduced_formula(),
        compat.name()
    );
    compat.explain(entry)
}

/// 按索引或 ID 选择条目
pub fn select_entry<'a>(
    entries: &'a [ComputedEntry],
    selection: &Selection,
) -> Result<&'a ComputedEntry> {
    match selection {
        Selection::Index(index) => {
            entries
                .get(*index)
                .ok_or(MpCompatError::EntryIndexOutOfRange {
                    index: *index,
                    count: entries.len(),
                })
        }
        Selection::EntryId(id) => entries
            .iter()
            .find(|e| e.entry_id.as_deref() == Some(id.as_str()))
            .ok_or_else(|| MpCompatError::EntryNotFound(id.clone())),
    }
}
