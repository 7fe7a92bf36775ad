//! # 能量修正模块
//!
//! 对计算条目按顺序应用一组修正规则（兼容性方案），并生成可读的修正说明。
//!
//! ## 功能
//! - POTCAR 输入集校验（不改变能量）
//! - 气相/阴离子能量修正
//! - GGA/GGA+U 混合修正
//! - 修正说明文本
//!
//! ## 依赖关系
//! - 被 `commands/` 使用
//! - 使用 `models/`
//! - 子模块: scheme, corrections, compatibility, explanation

pub mod compatibility;
pub mod corrections;
pub mod explanation;
pub mod scheme;

pub use compatibility::Compatibility;
pub use explanation::Explanation;
pub use scheme::SchemeConfig;

use crate::models::ComputedEntry;
use thiserror::Error;

/// 条目与修正方案不兼容
#[derive(Error, Debug, Clone, PartialEq)]
pub enum CompatibilityError {
    #[error("entry parameters are missing '{0}'")]
    MissingParameter(String),

    #[error("invalid POTCARs: expected [{expected}], found [{found}]")]
    InvalidPotcar { expected: String, found: String },

    #[error("invalid U value of {found} on {element} (expected {expected})")]
    InvalidHubbard {
        element: String,
        found: f64,
        expected: f64,
    },
}

/// 单条修正规则
pub trait Correction: Send + Sync {
    /// 规则名称
    fn name(&self) -> &str;

    /// 规则说明
    fn description(&self) -> &str;

    /// 计算修正值 (eV)；不适用时返回 0，条目不兼容时返回错误
    fn correction(&self, entry: &ComputedEntry) -> Result<f64, CompatibilityError>;
}
