//! # fetch 命令实现
//!
//! 列出与化学式匹配的条目，可选导出 CSV。
//!
//! ## 依赖关系
//! - 使用 `cli/fetch.rs` 定义的参数
//! - 使用 `client/`, `utils/output.rs`

use crate::cli::fetch::FetchArgs;
use crate::error::{MpCompatError, Result};
use crate::models::ComputedEntry;
use crate::utils::output;

use std::path::Path;
use tabled::{Table, Tabled};

/// 条目表格行
#[derive(Debug, Clone, Tabled)]
struct EntryRow {
    #[tabled(rename = "#")]
    index: usize,
    #[tabled(rename = "Entry ID")]
    entry_id: String,
    #[tabled(rename = "Formula")]
    formula: String,
    #[tabled(rename = "Run type")]
    run_type: String,
    #[tabled(rename = "Energy (eV)")]
    energy: String,
    #[tabled(rename = "E/atom (eV)")]
    energy_per_atom: String,
}

impl EntryRow {
    fn from_entry(index: usize, entry: &ComputedEntry) -> Self {
        EntryRow {
            index,
            entry_id: entry.display_id().to_string(),
            formula: entry.composition.reduced_formula(),
            run_type: entry.parameters.effective_run_type().to_string(),
            energy: format!("{:.6}", entry.uncorrected_energy()),
            energy_per_atom: entry
                .energy_per_atom()
                .map(|e| format!("{:.6}", e))
                .unwrap_or_default(),
        }
    }
}

/// 执行 fetch 命令
pub fn execute(args: FetchArgs, quiet: bool) -> Result<()> {
    let source = super::open_source(&args.source)?;
    let entries = super::fetch_entries(source.as_ref(), &args.formula, quiet)?;

    output::print_header(&format!("Entries for {}", args.formula));

    let rows: Vec<EntryRow> = entries
        .iter()
        .enumerate()
        .map(|(i, e)| EntryRow::from_entry(i, e))
        .collect();
    println!("{}", Table::new(&rows));

    output::print_info(&format!("{} entries from {}", entries.len(), source.describe()));

    if let Some(path) = &args.output {
        save_entries_csv(&entries, path)?;
        output::print_success(&format!("Entry list saved to '{}'", path.display()));
    }

    Ok(())
}

/// 保存条目列表到 CSV
fn save_entries_csv(entries: &[ComputedEntry], output_path: &Path) -> Result<()> {
    let mut wtr = csv::Writer::from_path(output_path)?;

    wtr.write_record([
        "index",
        "entry_id",
        "formula",
        "run_type",
        "energy_eV",
        "energy_per_atom_eV",
    ])?;

    for (i, e) in entries.iter().enumerate() {
        wtr.write_record([
            i.to_string(),
            e.entry_id.clone().unwrap_or_default(),
            e.composition.reduced_formula(),
            e.parameters.effective_run_type().to_string(),
            format!("{:.10}", e.uncorrected_energy()),
            e.energy_per_atom()
                .map(|v| format!("{:.10}", v))
                .unwrap_or_default(),
        ])?;
    }

    wtr.flush().map_err(|e| MpCompatError::FileWriteError {
        path: output_path.display().to_string(),
        source: e,
    })?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::fixtures::lifepo4_entry;

    #[test]
    fn test_entry_row() {
        let row = EntryRow::from_entry(0, &lifepo4_entry());
        assert_eq!(row.entry_id, "mp-19017");
        assert_eq!(row.formula, "LiFePO4");
        assert_eq!(row.run_type, "GGA+U");
        assert_eq!(row.energy, "-191.338121");
    }

    #[test]
    fn test_save_entries_csv() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("entries.csv");
        save_entries_csv(&[lifepo4_entry()], &path).unwrap();

        let text = std::fs::read_to_string(&path).unwrap();
        let mut lines = text.lines();
        assert_eq!(
            lines.next(),
            Some("index,entry_id,formula,run_type,energy_eV,energy_per_atom_eV")
        );
        assert!(lines
            .next()
            .unwrap()
            .starts_with("0,mp-19017,LiFePO4,GGA+U,-191.3381210000,"));
    }
}
