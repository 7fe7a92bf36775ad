//! # correct 命令实现
//!
//! 对与化学式匹配的全部条目应用修正方案。
//!
//! ## 功能
//! - 基于 rayon 线程池并行修正
//! - 终端表格展示未修正/修正后能量
//! - 列出不兼容（被排除）的条目及原因
//! - 可选导出 CSV
//!
//! ## 依赖关系
//! - 使用 `cli/correct.rs` 定义的参数
//! - 使用 `client/`, `compat/`, `utils/output.rs`

use crate::cli::correct::CorrectArgs;
use crate::compat::{Compatibility, SchemeConfig};
use crate::error::{MpCompatError, Result};
use crate::models::ComputedEntry;
use crate::utils::output;

use std::path::Path;
use tabled::{Table, Tabled};
use tracing::info;

/// 修正结果表格行
#[derive(Debug, Clone, Tabled)]
struct CorrectedRow {
    #[tabled(rename = "Entry ID")]
    entry_id: String,
    #[tabled(rename = "Formula")]
    formula: String,
    #[tabled(rename = "Uncorrected (eV)")]
    uncorrected: String,
    #[tabled(rename = "Correction (eV)")]
    correction: String,
    #[tabled(rename = "Corrected (eV)")]
    corrected: String,
    #[tabled(rename = "E/atom (eV)")]
    energy_per_atom: String,
}

impl CorrectedRow {
    fn from_entry(entry: &ComputedEntry) -> Self {
        CorrectedRow {
            entry_id: entry.display_id().to_string(),
            formula: entry.composition.reduced_formula(),
            uncorrected: format!("{:.6}", entry.uncorrected_energy()),
            correction: format!("{:.6}", entry.correction),
            corrected: format!("{:.6}", entry.corrected_energy()),
            energy_per_atom: entry
                .energy_per_atom()
                .map(|e| format!("{:.6}", e))
                .unwrap_or_default(),
        }
    }
}

/// 执行 correct 命令
pub fn execute(args: CorrectArgs, quiet: bool) -> Result<()> {
    let scheme = SchemeConfig::load(args.scheme.scheme.as_deref())?;
    let compat = Compatibility::from_scheme(&scheme);
    let source = super::open_source(&args.source)?;
    let entries = super::fetch_entries(source.as_ref(), &args.formula, quiet)?;

    output::print_header(&format!(
        "Applying {} to {} entries",
        compat.name(),
        entries.len()
    ));

    let jobs = if args.jobs == 0 {
        num_cpus::get()
    } else {
        args.jobs
    };
    info!("Processing entries on {} threads", jobs);

    // 配置 rayon 线程池
    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(jobs)
        .build()
        .map_err(|e| MpCompatError::Other(format!("Failed to build thread pool: {}", e)))?;

    // 安静模式不逐条报告被排除的条目
    let (mut corrected, excluded) = if quiet {
        let corrected = pool.install(|| compat.process_entries(&entries));
        let excluded = entries.len() - corrected.len();
        (corrected, excluded)
    } else {
        let (corrected, rejected) = pool.install(|| compat.partition_entries(&entries));
        for (i, reason) in &rejected {
            let entry = &entries[*i];
            output::print_excluded(
                entry.display_id(),
                &entry.composition.reduced_formula(),
                &reason.to_string(),
            );
        }
        (corrected, rejected.len())
    };

    if corrected.is_empty() {
        output::print_warning("No entries are compatible with the correction scheme.");
        return Ok(());
    }

    // 按修正后每原子能量排序
    corrected.sort_by(|a, b| {
        a.energy_per_atom()
            .partial_cmp(&b.energy_per_atom())
            .unwrap_or(std::cmp::Ordering::Equal)
    });

    let rows: Vec<CorrectedRow> = corrected.iter().map(CorrectedRow::from_entry).collect();
    println!("{}", Table::new(&rows));

    output::print_info(&format!(
        "{} compatible, {} excluded",
        corrected.len(),
        excluded
    ));

    if let Some(path) = &args.output {
        save_corrected_csv(&corrected, path)?;
        output::print_success(&format!("Corrected energies saved to '{}'", path.display()));
    }

    Ok(())
}

/// 保存修正结果到 CSV
fn save_corrected_csv(entries: &[ComputedEntry], output_path: &Path) -> Result<()> {
    let mut wtr = csv::Writer::from_path(output_path)?;

    wtr.write_record([
        "entry_id",
        "formula",
        "uncorrected_energy_eV",
        "correction_eV",
        "corrected_energy_eV",
        "energy_per_atom_eV",
    ])?;

    for e in entries {
        wtr.write_record([
            e.entry_id.clone().unwrap_or_default(),
            e.composition.reduced_formula(),
            format!("{:.10}", e.uncorrected_energy()),
            format!("{:.10}", e.correction),
            format!("{:.10}", e.corrected_energy()),
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

    fn corrected_reference() -> ComputedEntry {
        let compat = Compatibility::from_scheme(&SchemeConfig::materials_project().unwrap());
        compat.process_entry(&lifepo4_entry()).unwrap()
    }

    #[test]
    fn test_corrected_row() {
        let row = CorrectedRow::from_entry(&corrected_reference());
        assert_eq!(row.uncorrected, "-191.338121");
        assert_eq!(row.correction, "-22.168640");
        assert_eq!(row.corrected, "-213.506761");
    }

    #[test]
    fn test_save_corrected_csv() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("corrected.csv");
        save_corrected_csv(&[corrected_reference()], &path).unwrap();

        let mut reader = csv::Reader::from_path(&path).unwrap();
        let records: Vec<csv::StringRecord> = reader.records().map(|r| r.unwrap()).collect();
        assert_eq!(records.len(), 1);
        assert_eq!(&records[0][0], "mp-19017");
        assert_eq!(&records[0][1], "LiFePO4");

        let corrected: f64 = records[0][4].parse().unwrap();
        assert!((corrected - (-213.506761)).abs() < 1e-6);
    }
}
