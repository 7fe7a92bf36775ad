//! # 修正方案配置
//!
//! 修正方案以 TOML 描述：规则顺序、POTCAR 映射、气相/阴离子修正和 U 值表。
//! 内置旧版 Materials Project 方案，也可从文件加载自定义方案。
//!
//! ## 依赖关系
//! - 被 `compat/compatibility.rs`, `commands/` 使用
//! - 使用 `toml`, `serde`

use crate::error::{MpCompatError, Result};

use serde::Deserialize;
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;
use tracing::debug;

/// 内置旧版 Materials Project 方案
const MP_LEGACY_SCHEME: &str = include_str!("../../schemes/mp_legacy.toml");

/// 修正规则类型
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub enum CorrectionKind {
    PotcarCorrection,
    GasCorrection,
    UCorrection,
}

fn default_corrections() -> Vec<CorrectionKind> {
    vec![
        CorrectionKind::PotcarCorrection,
        CorrectionKind::GasCorrection,
        CorrectionKind::UCorrection,
    ]
}

/// 气相与阴离子修正表
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct GasConfig {
    /// 氧化物类型 → 每个 O 原子的修正 (eV)
    #[serde(default)]
    pub oxide: BTreeMap<String, f64>,

    /// 元素 → 每原子修正 (eV)
    #[serde(default)]
    pub anion: BTreeMap<String, f64>,
}

/// 修正方案
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SchemeConfig {
    /// 方案名称，出现在解释文本中
    pub name: String,

    /// 规则显示名前缀，如 `MP` → `MP Gas Correction`
    #[serde(default)]
    pub label: String,

    /// 规则执行顺序
    #[serde(default = "default_corrections")]
    pub corrections: Vec<CorrectionKind>,

    /// 元素 → 期望的 POTCAR 标签
    #[serde(default)]
    pub potcar: BTreeMap<String, String>,

    #[serde(default)]
    pub gas: GasConfig,

    /// 阴离子 → (元素 → 期望的 U 值)
    #[serde(default)]
    pub u_values: BTreeMap<String, BTreeMap<String, f64>>,

    /// 阴离子 → (元素 → 每原子修正)
    #[serde(default)]
    pub u_corrections: BTreeMap<String, BTreeMap<String, f64>>,
}

impl SchemeConfig {
    /// 内置的旧版 Materials Project 方案
    pub fn materials_project() -> Result<Self> {
        Self::from_toml_str(MP_LEGACY_SCHEME, "built-in MP scheme")
    }

    /// 从 TOML 文件加载
    pub fn from_file(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(MpCompatError::FileNotFound {
                path: path.display().to_string(),
            });
        }
        let text = fs::read_to_string(path).map_err(|e| MpCompatError::FileReadError {
            path: path.display().to_string(),
            source: e,
        })?;
        Self::from_toml_str(&text, &path.display().to_string())
    }

    /// 从 TOML 文本解析
    pub fn from_toml_str(text: &str, source_name: &str) -> Result<Self> {
        let config: SchemeConfig = toml::from_str(text).map_err(|e| MpCompatError::ParseError {
            format: "scheme TOML".to_string(),
            source_name: source_name.to_string(),
            reason: e.to_string(),
        })?;

        if config.corrections.is_empty() {
            return Err(MpCompatError::ConfigError(format!(
                "scheme '{}' defines no corrections",
                config.name
            )));
        }

        debug!(
            "Loaded scheme '{}' from {} ({} rules)",
            config.name,
            source_name,
            config.corrections.len()
        );
        Ok(config)
    }

    /// 加载 `path` 指定的方案，未指定时使用内置方案
    pub fn load(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(p) => Self::from_file(p),
            None => Self::materials_project(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_builtin_scheme_loads() {
        let scheme = SchemeConfig::materials_project().unwrap();
        assert_eq!(scheme.name, "MaterialsProjectCompatibility");
        assert_eq!(scheme.label, "MP");
        assert_eq!(scheme.corrections, default_corrections());
        assert_eq!(scheme.potcar.get("Fe").map(String::as_str), Some("Fe_pv"));
        assert!((scheme.gas.oxide["oxide"] - (-0.70229)).abs() < 1e-9);
        assert!((scheme.u_values["O"]["Fe"] - 5.3).abs() < 1e-9);
        assert!((scheme.u_corrections["O"]["Fe"] - (-2.733)).abs() < 1e-9);
    }

    #[test]
    fn test_unknown_keys_rejected() {
        let text = "name = \"X\"\nbogus = 1\n";
        assert!(matches!(
            SchemeConfig::from_toml_str(text, "inline"),
            Err(MpCompatError::ParseError { .. })
        ));
    }

    #[test]
    fn test_empty_rule_list_rejected() {
        let text = "name = \"X\"\ncorrections = []\n";
        assert!(matches!(
            SchemeConfig::from_toml_str(text, "inline"),
            Err(MpCompatError::ConfigError(_))
        ));
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            "name = \"Custom\"\ncorrections = [\"GasCorrection\"]\n[gas.oxide]\noxide = -0.5"
        )
        .unwrap();

        let scheme = SchemeConfig::load(Some(file.path())).unwrap();
        assert_eq!(scheme.name, "Custom");
        assert!(scheme.label.is_empty());
        assert_eq!(scheme.corrections, vec![CorrectionKind::GasCorrection]);
        assert!(scheme.potcar.is_empty());

        let missing = SchemeConfig::load(Some(Path::new("/nonexistent/scheme.toml")));
        assert!(matches!(missing, Err(MpCompatError::FileNotFound { .. })));
    }
}
