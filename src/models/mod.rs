//! # 数据模型模块
//!
//! 定义元素、化学组成和计算条目数据模型。
//!
//! ## 依赖关系
//! - 被 `client/`, `compat/` 和 `commands/` 使用
//! - 子模块: element, composition, entry

pub mod composition;
pub mod element;
pub mod entry;

#[cfg(test)]
pub mod fixtures;

pub use composition::Composition;
pub use entry::ComputedEntry;
