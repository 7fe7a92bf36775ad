//! # 本地条目来源
//!
//! 从 JSON 文件或目录（按 glob 模式收集文件）读取条目，按约化化学式筛选。
//!
//! ## 依赖关系
//! - 被 `commands/` 使用
//! - 使用 `walkdir` 遍历目录，`glob` 匹配文件名

use super::{parse_entry_document, EntrySource};
use crate::error::{MpCompatError, Result};
use crate::models::{Composition, ComputedEntry};

use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};
use walkdir::WalkDir;

/// 本地 JSON 条目来源
pub struct LocalEntrySource {
    /// 文件或目录
    path: PathBuf,
    /// 目录模式下的文件名模式
    pattern: glob::Pattern,
}

impl LocalEntrySource {
    pub fn new(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        if !path.exists() {
            return Err(MpCompatError::FileNotFound {
                path: path.display().to_string(),
            });
        }
        Ok(LocalEntrySource {
            path,
            pattern: default_pattern(),
        })
    }

    /// 设置目录模式下的文件名模式（如 "*.json"）
    pub fn with_pattern(mut self, pattern: &str) -> Result<Self> {
        self.pattern = glob::Pattern::new(pattern).map_err(|e| {
            MpCompatError::InvalidArgument(format!("Invalid pattern '{}': {}", pattern, e))
        })?;
        Ok(self)
    }

    /// 收集待读取的文件（排序后返回，保证顺序稳定）
    fn collect_files(&self) -> Vec<PathBuf> {
        if self.path.is_file() {
            return vec![self.path.clone()];
        }

        let mut files: Vec<PathBuf> = WalkDir::new(&self.path)
            .into_iter()
            .filter_map(|e| e.ok())
            .filter(|e| e.file_type().is_file())
            .filter(|e| {
                e.file_name()
                    .to_str()
                    .map(|name| self.pattern.matches(name))
                    .unwrap_or(false)
            })
            .map(|e| e.path().to_path_buf())
            .collect();
        files.sort();
        files
    }

    /// 读取全部条目
    pub fn all_entries(&self) -> Result<Vec<ComputedEntry>> {
        let files = self.collect_files();
        if files.is_empty() {
            warn!(
                "No files matching '{}' under {}",
                self.pattern.as_str(),
                self.path.display()
            );
        }

        let mut entries = Vec::new();
        for file in &files {
            entries.extend(read_entry_file(file)?);
        }
        Ok(entries)
    }
}

impl EntrySource for LocalEntrySource {
    fn get_entries(&self, formula: &str) -> Result<Vec<ComputedEntry>> {
        let target = Composition::from_formula(formula)?.reduced_formula();

        let matched: Vec<ComputedEntry> = self
            .all_entries()?
            .into_iter()
            .filter(|e| e.composition.reduced_formula() == target)
            .collect();

        debug!(
            "{} local entries match {} in {}",
            matched.len(),
            target,
            self.path.display()
        );
        Ok(matched)
    }

    fn describe(&self) -> String {
        format!("local entries ({})", self.path.display())
    }
}

fn default_pattern() -> glob::Pattern {
    glob::Pattern::new("*.json").expect("valid default pattern")
}

fn read_entry_file(path: &Path) -> Result<Vec<ComputedEntry>> {
    let text = fs::read_to_string(path).map_err(|e| MpCompatError::FileReadError {
        path: path.display().to_string(),
        source: e,
    })?;
    parse_entry_document(&text, &path.display().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs::File;
    use std::io::Write;

    fn write_json(dir: &Path, name: &str, body: &str) -> PathBuf {
        let path = dir.join(name);
        let mut f = File::create(&path).unwrap();
        f.write_all(body.as_bytes()).unwrap();
        path
    }

    const ENTRIES: &str = r#"[
        {"entry_id": "mp-19017", "energy": -191.338121, "composition": {"Li": 4, "Fe": 4, "P": 4, "O": 16}},
        {"entry_id": "mp-19", "energy": -67.0, "composition": {"Fe": 4, "O": 6}},
        {"entry_id": "mp-1", "energy": -47.0, "composition": {"Li": 1, "Fe": 1, "P": 1, "O": 4}}
    ]"#;

    #[test]
    fn test_filter_by_reduced_formula() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_json(dir.path(), "entries.json", ENTRIES);

        let source = LocalEntrySource::new(&path).unwrap();
        let entries = source.get_entries("LiFePO4").unwrap();
        let ids: Vec<_> = entries.iter().map(|e| e.display_id()).collect();
        assert_eq!(ids, vec!["mp-19017", "mp-1"]);

        assert_eq!(source.get_entries("Fe2O3").unwrap().len(), 1);
        assert!(source.get_entries("NaCl").unwrap().is_empty());
    }

    #[test]
    fn test_directory_with_pattern() {
        let dir = tempfile::tempdir().unwrap();
        write_json(dir.path(), "a.json", ENTRIES);
        write_json(
            dir.path(),
            "b.json",
            r#"{"entry_id": "mp-5", "energy": -20.0, "composition": {"Fe": 2, "O": 3}}"#,
        );
        write_json(dir.path(), "notes.txt", "not json");

        let source = LocalEntrySource::new(dir.path()).unwrap();
        assert_eq!(source.all_entries().unwrap().len(), 4);
        assert_eq!(source.get_entries("Fe2O3").unwrap().len(), 2);

        let only_b = LocalEntrySource::new(dir.path())
            .unwrap()
            .with_pattern("b*.json")
            .unwrap();
        assert_eq!(only_b.all_entries().unwrap().len(), 1);
    }

    #[test]
    fn test_missing_path() {
        assert!(matches!(
            LocalEntrySource::new("/nonexistent/entries.json"),
            Err(MpCompatError::FileNotFound { .. })
        ));
    }
}
