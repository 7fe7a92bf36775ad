//! # 兼容性方案
//!
//! 将有序修正规则组合成一个无状态方案，用于修正单个或批量条目并生成说明。
//!
//! ## 依赖关系
//! - 被 `commands/explain.rs`, `commands/correct.rs` 使用
//! - 使用 `compat/corrections.rs`, `compat/explanation.rs`
//! - 使用 `rayon` 并行处理批量条目

use super::corrections::{GasCorrection, PotcarCorrection, UCorrection};
use super::explanation::Explanation;
use super::scheme::{CorrectionKind, SchemeConfig};
use super::{CompatibilityError, Correction};
use crate::error::{MpCompatError, Result};
use crate::models::ComputedEntry;

use rayon::prelude::*;
use serde::Serialize;
use tracing::{debug, trace};

/// 单条规则在某条目上的修正结果
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AppliedCorrection {
    pub name: String,
    pub description: String,
    /// 修正值 (eV)
    pub value: f64,
}

/// 兼容性方案
pub struct Compatibility {
    name: String,
    corrections: Vec<Box<dyn Correction>>,
}

impl Compatibility {
    /// 按方案配置构建规则列表
    pub fn from_scheme(scheme: &SchemeConfig) -> Self {
        let corrections = scheme
            .corrections
            .iter()
            .map(|kind| -> Box<dyn Correction> {
                match kind {
                    CorrectionKind::PotcarCorrection => Box::new(PotcarCorrection::new(scheme)),
                    CorrectionKind::GasCorrection => Box::new(GasCorrection::new(scheme)),
                    CorrectionKind::UCorrection => Box::new(UCorrection::new(scheme)),
                }
            })
            .collect();

        Compatibility {
            name: scheme.name.clone(),
            corrections,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// 规则名称（按执行顺序）
    pub fn correction_names(&self) -> Vec<&str> {
        self.corrections.iter().map(|c| c.name()).collect()
    }

    /// 逐条计算修正值；任一规则拒绝时返回错误
    pub fn get_adjustments(
        &self,
        entry: &ComputedEntry,
    ) -> std::result::Result<Vec<AppliedCorrection>, CompatibilityError> {
        self.corrections
            .iter()
            .map(|c| {
                let value = c.correction(entry)?;
                trace!("{} on {}: {:.6} eV", c.name(), entry.display_id(), value);
                Ok(AppliedCorrection {
                    name: c.name().to_string(),
                    description: c.description().to_string(),
                    value,
                })
            })
            .collect()
    }

    /// 应用全部规则，已有修正会被替换而不是叠加
    fn apply(&self, entry: &ComputedEntry) -> std::result::Result<ComputedEntry, CompatibilityError> {
        let adjustments = self.get_adjustments(entry)?;
        let mut corrected = entry.clone();
        corrected.correction = adjustments.iter().map(|a| a.value).sum();
        Ok(corrected)
    }

    /// 返回修正后的副本；不兼容时返回 `None`
    pub fn process_entry(&self, entry: &ComputedEntry) -> Option<ComputedEntry> {
        match self.apply(entry) {
            Ok(corrected) => Some(corrected),
            Err(e) => {
                debug!(
                    "Excluding {} ({}): {}",
                    entry.display_id(),
                    entry.composition.reduced_formula(),
                    e
                );
                None
            }
        }
    }

    /// 并行修正批量条目，仅保留兼容条目，保持输入顺序
    pub fn process_entries(&self, entries: &[ComputedEntry]) -> Vec<ComputedEntry> {
        entries
            .par_iter()
            .filter_map(|entry| self.process_entry(entry))
            .collect()
    }

    /// 并行修正批量条目，返回 (修正后的兼容条目, 不兼容条目的索引与原因)
    pub fn partition_entries(
        &self,
        entries: &[ComputedEntry],
    ) -> (Vec<ComputedEntry>, Vec<(usize, CompatibilityError)>) {
        let outcomes: Vec<_> = entries.par_iter().map(|entry| self.apply(entry)).collect();

        let mut compatible = Vec::new();
        let mut rejected = Vec::new();
        for (i, outcome) in outcomes.into_iter().enumerate() {
            match outcome {
                Ok(entry) => compatible.push(entry),
                Err(e) => {
                    debug!("Excluding entry #{} ({}): {}", i, entries[i].display_id(), e);
                    rejected.push((i, e));
                }
            }
        }
        (compatible, rejected)
    }

    /// 生成修正说明
    pub fn explain(&self, entry: &ComputedEntry) -> Result<Explanation> {
        let corrections =
            self.get_adjustments(entry)
                .map_err(|source| MpCompatError::Incompatible {
                    scheme: self.name.clone(),
                    source,
                })?;

        Ok(Explanation::new(&self.name, entry, corrections))
    }
}
