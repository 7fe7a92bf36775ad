//! # 统一错误处理模块
//!
//! 定义 mpcompat 的所有错误类型，使用 `thiserror` 派生。
//!
//! ## 依赖关系
//! - 被所有其他模块使用
//! - 引用 `compat::CompatibilityError`

use crate::compat::CompatibilityError;
use thiserror::Error;

/// mpcompat 统一错误类型
#[derive(Error, Debug)]
pub enum MpCompatError {
    // ─────────────────────────────────────────────────────────────
    // I/O 错误
    // ─────────────────────────────────────────────────────────────
    #[error("Failed to read file: {path}")]
    FileReadError {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to write file: {path}")]
    FileWriteError {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("File not found: {path}")]
    FileNotFound { path: String },

    // ─────────────────────────────────────────────────────────────
    // 解析错误
    // ─────────────────────────────────────────────────────────────
    #[error("Failed to parse {format} from {source_name}\nReason: {reason}")]
    ParseError {
        format: String,
        source_name: String,
        reason: String,
    },

    #[error("Invalid formula: {0}")]
    InvalidFormula(String),

    #[error("Unknown element: {0}")]
    UnknownElement(String),

    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),

    // ─────────────────────────────────────────────────────────────
    // 配置错误
    // ─────────────────────────────────────────────────────────────
    #[error("Configuration error: {0}")]
    ConfigError(String),

    // ─────────────────────────────────────────────────────────────
    // 远程查询错误
    // ─────────────────────────────────────────────────────────────
    #[error("Network error: {0}")]
    NetworkError(#[from] reqwest::Error),

    #[error("No entries found for formula: {formula}")]
    NoEntries { formula: String },

    #[error("Entry selection out of range: {index} (only {count} entries)")]
    EntryIndexOutOfRange { index: usize, count: usize },

    #[error("No entry with id '{0}'")]
    EntryNotFound(String),

    // ─────────────────────────────────────────────────────────────
    // 修正错误
    // ─────────────────────────────────────────────────────────────
    #[error("Entry is incompatible with {scheme}: {source}")]
    Incompatible {
        scheme: String,
        #[source]
        source: CompatibilityError,
    },

    // ─────────────────────────────────────────────────────────────
    // 参数错误
    // ─────────────────────────────────────────────────────────────
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    // ─────────────────────────────────────────────────────────────
    // CSV 错误
    // ─────────────────────────────────────────────────────────────
    #[error("CSV error: {0}")]
    CsvError(#[from] csv::Error),

    // ─────────────────────────────────────────────────────────────
    // 其他
    // ─────────────────────────────────────────────────────────────
    #[error("{0}")]
    Other(String),
}

/// Result 类型别名
pub type Result<T> = std::result::Result<T, MpCompatError>;
