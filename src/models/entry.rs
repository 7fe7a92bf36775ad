//! # 计算条目数据模型
//!
//! 一次第一性原理计算的能量结果：未修正总能、化学组成、计算参数和附加数据。
//! JSON 格式与 Materials Project / pymatgen 的 `ComputedEntry` 字典一致。
//!
//! ## 依赖关系
//! - 被 `client/`, `compat/`, `commands/` 使用
//! - 使用 `models/composition.rs`

use super::composition::Composition;

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// 计算参数（POTCAR、Hubbard U 等元数据）
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EntryParameters {
    /// 计算类型，如 "GGA", "GGA+U"
    #[serde(default)]
    pub run_type: Option<String>,

    /// 是否使用了 Hubbard U
    #[serde(default)]
    pub is_hubbard: bool,

    /// 各元素的 U 值 (eV)
    #[serde(default, deserialize_with = "null_as_default")]
    pub hubbards: BTreeMap<String, f64>,

    /// POTCAR 符号，如 "PAW_PBE Fe_pv 06Sep2000"
    #[serde(default, deserialize_with = "null_as_default")]
    pub potcar_symbols: Vec<String>,
}

impl EntryParameters {
    /// 计算类型；缺失时根据 `is_hubbard` 推断
    pub fn effective_run_type(&self) -> &str {
        match self.run_type.as_deref() {
            Some(rt) => rt,
            None if self.is_hubbard => "GGA+U",
            None => "GGA",
        }
    }

    /// 元素的 U 值（未设置时为 0）
    pub fn hubbard_u(&self, symbol: &str) -> f64 {
        self.hubbards.get(symbol).copied().unwrap_or(0.0)
    }

    /// POTCAR 标签集合：取每个符号的第二个字段（"PAW_PBE Fe_pv 06Sep2000" → "Fe_pv"）
    pub fn potcar_labels(&self) -> Vec<&str> {
        self.potcar_symbols
            .iter()
            .filter_map(|s| {
                let mut parts = s.split_whitespace();
                let first = parts.next()?;
                Some(parts.next().unwrap_or(first))
            })
            .collect()
    }
}

/// 计算条目
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComputedEntry {
    /// 条目 ID，如 "mp-19017"
    #[serde(default)]
    pub entry_id: Option<String>,

    /// 化学组成
    pub composition: Composition,

    /// 未修正总能 (eV)
    pub energy: f64,

    /// 已应用的修正总和 (eV)
    #[serde(default)]
    pub correction: f64,

    /// 计算参数
    #[serde(default)]
    pub parameters: EntryParameters,

    /// 附加数据，如 `oxide_type`
    #[serde(default, deserialize_with = "null_as_default")]
    pub data: BTreeMap<String, serde_json::Value>,
}

impl ComputedEntry {
    pub fn new(composition: Composition, energy: f64) -> Self {
        ComputedEntry {
            entry_id: None,
            composition,
            energy,
            correction: 0.0,
            parameters: EntryParameters::default(),
            data: BTreeMap::new(),
        }
    }

    pub fn with_id(mut self, entry_id: impl Into<String>) -> Self {
        self.entry_id = Some(entry_id.into());
        self
    }

    pub fn with_parameters(mut self, parameters: EntryParameters) -> Self {
        self.parameters = parameters;
        self
    }

    pub fn with_data(mut self, key: impl Into<String>, value: serde_json::Value) -> Self {
        self.data.insert(key.into(), value);
        self
    }

    /// 未修正总能
    pub fn uncorrected_energy(&self) -> f64 {
        self.energy
    }

    /// 修正后总能
    pub fn corrected_energy(&self) -> f64 {
        self.energy + self.correction
    }

    /// 每原子修正后能量
    pub fn energy_per_atom(&self) -> Option<f64> {
        let n = self.composition.num_atoms();
        if n > 0.0 {
            Some(self.corrected_energy() / n)
        } else {
            None
        }
    }

    /// 字符串类型的附加数据
    pub fn data_str(&self, key: &str) -> Option<&str> {
        self.data.get(key).and_then(|v| v.as_str())
    }

    /// 显示用 ID
    pub fn display_id(&self) -> &str {
        self.entry_id.as_deref().unwrap_or("-")
    }
}

/// 将 JSON `null` 视为默认值
fn null_as_default<'de, D, T>(deserializer: D) -> std::result::Result<T, D::Error>
where
    D: serde::Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}
