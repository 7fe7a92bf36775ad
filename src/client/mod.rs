//! # 条目获取模块
//!
//! 按化学式获取计算条目。远程来源为 Materials Project REST API，
//! 本地来源为 JSON 文件或目录。
//!
//! ## 依赖关系
//! - 被 `commands/` 使用
//! - 使用 `models/`
//! - 子模块: rest, local

pub mod local;
pub mod rest;

pub use local::LocalEntrySource;
pub use rest::MpRestClient;

use crate::error::{MpCompatError, Result};
use crate::models::ComputedEntry;

use serde::Deserialize;
use std::collections::BTreeMap;

/// 条目来源
pub trait EntrySource {
    /// 返回与化学式匹配的条目（按来源顺序），无匹配时返回空列表
    fn get_entries(&self, formula: &str) -> Result<Vec<ComputedEntry>>;

    /// 来源描述，用于日志
    fn describe(&self) -> String;
}

/// `data` 数组中的一项：thermo 文档或单个条目
#[derive(Deserialize)]
#[serde(untagged)]
enum DataItem {
    Thermo {
        entries: BTreeMap<String, ComputedEntry>,
    },
    Entry(ComputedEntry),
}

/// 支持的 JSON 文档形式
#[derive(Deserialize)]
#[serde(untagged)]
enum EntryDocument {
    List(Vec<ComputedEntry>),
    Single(ComputedEntry),
    Response { data: Vec<DataItem> },
}

/// 解析条目 JSON：条目数组、单个条目，或 `{"data": [...]}` 响应
///
/// thermo 文档的 `entries` 映射按键名顺序展开。
pub fn parse_entry_document(text: &str, source_name: &str) -> Result<Vec<ComputedEntry>> {
    let doc: EntryDocument =
        serde_json::from_str(text).map_err(|e| MpCompatError::ParseError {
            format: "entry JSON".to_string(),
            source_name: source_name.to_string(),
            reason: e.to_string(),
        })?;

    Ok(match doc {
        EntryDocument::List(entries) => entries,
        EntryDocument::Single(entry) => vec![entry],
        EntryDocument::Response { data } => data
            .into_iter()
            .flat_map(|item| match item {
                DataItem::Thermo { entries } => entries.into_values().collect::<Vec<_>>(),
                DataItem::Entry(entry) => vec![entry],
            })
            .collect(),
    })
}
