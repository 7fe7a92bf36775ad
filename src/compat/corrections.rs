//! # 修正规则实现
//!
//! - `PotcarCorrection`: 校验 POTCAR 是否属于方案的输入集，修正值恒为 0
//! - `GasCorrection`: 氧化物/阴离子的气相能量修正
//! - `UCorrection`: GGA/GGA+U 混合修正
//!
//! ## 依赖关系
//! - 被 `compat/compatibility.rs` 使用
//! - 使用 `compat/scheme.rs`, `models/`

use super::scheme::SchemeConfig;
use super::{CompatibilityError, Correction};
use crate::models::ComputedEntry;

use std::collections::{BTreeMap, BTreeSet};

/// U 值比较容差
const U_TOLERANCE: f64 = 1e-6;

/// 规则显示名：方案前缀 + 规则名，如 `MP Gas Correction`
fn display_name(label: &str, rule: &str) -> String {
    if label.is_empty() {
        rule.to_string()
    } else {
        format!("{} {}", label, rule)
    }
}

// ─────────────────────────────────────────────────────────────
// POTCAR 校验
// ─────────────────────────────────────────────────────────────

pub const POTCAR_DESCRIPTION: &str = "Checks that the POTCARs used in the calculation \
belong to the input set this scheme was fitted with, so that runs made with \
different pseudopotentials are never compared against each other. \
Entry parameters must carry a \"potcar_symbols\" list, e.g. \
[\"PAW_PBE Fe_pv 06Sep2000\", \"PAW_PBE O 08Apr2002\"] for Fe2O3.";

/// POTCAR 输入集校验
pub struct PotcarCorrection {
    name: String,
    valid_potcars: BTreeMap<String, String>,
}

impl PotcarCorrection {
    pub fn new(scheme: &SchemeConfig) -> Self {
        PotcarCorrection {
            name: display_name(&scheme.label, "Potcar Correction"),
            valid_potcars: scheme.potcar.clone(),
        }
    }
}

impl Correction for PotcarCorrection {
    fn name(&self) -> &str {
        &self.name
    }

    fn description(&self) -> &str {
        POTCAR_DESCRIPTION
    }

    fn correction(&self, entry: &ComputedEntry) -> Result<f64, CompatibilityError> {
        let found: BTreeSet<&str> = entry.parameters.potcar_labels().into_iter().collect();
        if found.is_empty() {
            return Err(CompatibilityError::MissingParameter(
                "potcar_symbols".to_string(),
            ));
        }

        let expected: BTreeSet<Option<&str>> = entry
            .composition
            .elements()
            .map(|el| self.valid_potcars.get(el).map(String::as_str))
            .collect();
        let found_opt: BTreeSet<Option<&str>> = found.iter().map(|s| Some(*s)).collect();

        if expected != found_opt {
            return Err(CompatibilityError::InvalidPotcar {
                expected: join_labels(expected.iter().map(|l| l.unwrap_or("?"))),
                found: join_labels(found.iter().copied()),
            });
        }

        Ok(0.0)
    }
}

fn join_labels<'a>(labels: impl Iterator<Item = &'a str>) -> String {
    labels.collect::<Vec<_>>().join(", ")
}

// ─────────────────────────────────────────────────────────────
// 气相修正
// ─────────────────────────────────────────────────────────────

pub const GAS_DESCRIPTION: &str = "Corrects the energies of gaseous elements bound in \
solids (oxide-type dependent O correction and per-atom anion corrections) so that \
formation energies come out right. Only meaningful for calculations run within \
the same input set.";

/// 气相与阴离子修正
pub struct GasCorrection {
    name: String,
    oxide_correction: BTreeMap<String, f64>,
    anion_correction: BTreeMap<String, f64>,
}

impl GasCorrection {
    pub fn new(scheme: &SchemeConfig) -> Self {
        GasCorrection {
            name: display_name(&scheme.label, "Gas Correction"),
            oxide_correction: scheme.gas.oxide.clone(),
            anion_correction: scheme.gas.anion.clone(),
        }
    }

    /// O 的修正：按 `oxide_type`（默认 oxide，hydroxide 按 oxide 计）
    fn oxide_part(&self, entry: &ComputedEntry) -> f64 {
        if !entry.composition.contains("O") {
            return 0.0;
        }
        let n_oxygen = entry.composition.amount("O");

        let oxide_type = match entry.data_str("oxide_type") {
            Some("hydroxide") | None => "oxide",
            Some(t) => t,
        };

        self.oxide_correction
            .get(oxide_type)
            .map(|c| c * n_oxygen)
            .unwrap_or(0.0)
    }
}

impl Correction for GasCorrection {
    fn name(&self) -> &str {
        &self.name
    }

    fn description(&self) -> &str {
        GAS_DESCRIPTION
    }

    fn correction(&self, entry: &ComputedEntry) -> Result<f64, CompatibilityError> {
        let run_type = entry.parameters.effective_run_type();
        if run_type != "GGA" && run_type != "GGA+U" {
            return Ok(0.0);
        }

        let comp = &entry.composition;
        if comp.len() < 2 {
            return Ok(0.0);
        }

        let mut correction = self.oxide_part(entry);

        if let Some(anion) = comp.most_electronegative() {
            if anion != "O" {
                if let Some(c) = self.anion_correction.get(anion) {
                    correction += c * comp.amount(anion);
                }
            }
        }

        Ok(correction)
    }
}

// ─────────────────────────────────────────────────────────────
// GGA/GGA+U 混合修正
// ─────────────────────────────────────────────────────────────

pub const U_DESCRIPTION: &str = "Advanced correction for mixing GGA and GGA+U \
calculations. Transition-metal compounds of the anions listed in the scheme \
must be run with the scheme's U values; every other system must be run \
without U. The per-atom correction of each U element is then added. \
Entry parameters must carry a \"hubbards\" map of the applied U values.";

/// GGA/GGA+U 混合修正
pub struct UCorrection {
    name: String,
    u_values: BTreeMap<String, BTreeMap<String, f64>>,
    u_corrections: BTreeMap<String, BTreeMap<String, f64>>,
}

impl UCorrection {
    pub fn new(scheme: &SchemeConfig) -> Self {
        UCorrection {
            name: display_name(&scheme.label, "Advanced Correction"),
            u_values: scheme.u_values.clone(),
            u_corrections: scheme.u_corrections.clone(),
        }
    }
}

impl Correction for UCorrection {
    fn name(&self) -> &str {
        &self.name
    }

    fn description(&self) -> &str {
        U_DESCRIPTION
    }

    fn correction(&self, entry: &ComputedEntry) -> Result<f64, CompatibilityError> {
        let comp = &entry.composition;
        let Some(anion) = comp.most_electronegative() else {
            return Ok(0.0);
        };

        let empty = BTreeMap::new();
        let expected_u = self.u_values.get(anion).unwrap_or(&empty);
        let ucorr = self.u_corrections.get(anion).unwrap_or(&empty);

        let mut correction = 0.0;
        for (el, amount) in comp.iter() {
            let found = entry.parameters.hubbard_u(el);
            let expected = expected_u.get(el).copied().unwrap_or(0.0);
            if (found - expected).abs() > U_TOLERANCE {
                return Err(CompatibilityError::InvalidHubbard {
                    element: el.to_string(),
                    found,
                    expected,
                });
            }
            if let Some(c) = ucorr.get(el) {
                correction += c * amount;
            }
        }

        Ok(correction)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::fixtures::{gga_entry, lifepo4_entry};

    fn scheme() -> SchemeConfig {
        SchemeConfig::materials_project().unwrap()
    }

    #[test]
    fn test_potcar_valid_set() {
        let corr = PotcarCorrection::new(&scheme());
        assert_eq!(corr.correction(&lifepo4_entry()).unwrap(), 0.0);
    }

    #[test]
    fn test_potcar_mismatch() {
        let corr = PotcarCorrection::new(&scheme());
        let entry = gga_entry("Fe2O3", -67.0, &["Fe", "O"]);
        assert!(matches!(
            corr.correction(&entry),
            Err(CompatibilityError::InvalidPotcar { .. })
        ));
    }

    #[test]
    fn test_potcar_extra_label_rejected() {
        let corr = PotcarCorrection::new(&scheme());
        let entry = gga_entry("Fe2O3", -67.0, &["Fe_pv", "O", "Li_sv"]);
        match corr.correction(&entry) {
            Err(CompatibilityError::InvalidPotcar { expected, found }) => {
                assert_eq!(expected, "Fe_pv, O");
                assert_eq!(found, "Fe_pv, Li_sv, O");
            }
            other => panic!("unexpected result: {:?}", other),
        }
    }

    #[test]
    fn test_rule_names_carry_scheme_label() {
        let mp = scheme();
        assert_eq!(PotcarCorrection::new(&mp).name(), "MP Potcar Correction");
        assert_eq!(GasCorrection::new(&mp).name(), "MP Gas Correction");
        assert_eq!(UCorrection::new(&mp).name(), "MP Advanced Correction");

        let mut bare = scheme();
        bare.label.clear();
        assert_eq!(GasCorrection::new(&bare).name(), "Gas Correction");
    }

    #[test]
    fn test_potcar_missing_symbols() {
        let corr = PotcarCorrection::new(&scheme());
        let entry = gga_entry("Fe2O3", -67.0, &[]);
        assert_eq!(
            corr.correction(&entry),
            Err(CompatibilityError::MissingParameter("potcar_symbols".to_string()))
        );
    }

    #[test]
    fn test_gas_oxide_correction() {
        let corr = GasCorrection::new(&scheme());
        let value = corr.correction(&lifepo4_entry()).unwrap();
        assert!((value - (-11.23664)).abs() < 1e-6);
    }

    #[test]
    fn test_gas_oxide_type_variants() {
        let corr = GasCorrection::new(&scheme());
        let base = gga_entry("Li2O2", -20.0, &["Li_sv", "O"]);

        let peroxide = base.clone().with_data("oxide_type", serde_json::json!("peroxide"));
        assert!((corr.correction(&peroxide).unwrap() - (-0.46587 * 2.0)).abs() < 1e-6);

        let hydroxide = base.clone().with_data("oxide_type", serde_json::json!("hydroxide"));
        assert!((corr.correction(&hydroxide).unwrap() - (-0.70229 * 2.0)).abs() < 1e-6);

        let none = base.with_data("oxide_type", serde_json::json!("None"));
        assert_eq!(corr.correction(&none).unwrap(), 0.0);
    }

    #[test]
    fn test_gas_anion_only_when_most_electronegative() {
        let corr = GasCorrection::new(&scheme());

        let fluoride = gga_entry("LiF", -10.0, &["Li_sv", "F"]);
        assert!((corr.correction(&fluoride).unwrap() - (-0.462)).abs() < 1e-6);

        // S 不是 SO4 中电负性最高的元素
        let sulfate = gga_entry("Li2SO4", -40.0, &["Li_sv", "S", "O"]);
        assert!((corr.correction(&sulfate).unwrap() - (-0.70229 * 4.0)).abs() < 1e-6);
    }

    #[test]
    fn test_gas_skips_elements_and_other_run_types() {
        let corr = GasCorrection::new(&scheme());
        let oxygen = gga_entry("O2", -9.8, &["O"]);
        assert_eq!(corr.correction(&oxygen).unwrap(), 0.0);

        let mut scan = gga_entry("Li2O", -14.0, &["Li_sv", "O"]);
        scan.parameters.run_type = Some("R2SCAN".to_string());
        assert_eq!(corr.correction(&scan).unwrap(), 0.0);
    }

    #[test]
    fn test_u_correction_for_oxide() {
        let corr = UCorrection::new(&scheme());
        let value = corr.correction(&lifepo4_entry()).unwrap();
        assert!((value - (-10.932)).abs() < 1e-6);
    }

    #[test]
    fn test_u_rejects_gga_oxide_of_u_element() {
        let corr = UCorrection::new(&scheme());
        let entry = gga_entry("Fe2O3", -67.0, &["Fe_pv", "O"]);
        match corr.correction(&entry) {
            Err(CompatibilityError::InvalidHubbard {
                element, expected, ..
            }) => {
                assert_eq!(element, "Fe");
                assert!((expected - 5.3).abs() < 1e-9);
            }
            other => panic!("unexpected result: {:?}", other),
        }
    }

    #[test]
    fn test_u_rejects_u_in_non_oxide() {
        let corr = UCorrection::new(&scheme());
        let mut entry = lifepo4_entry();
        entry.composition = crate::models::Composition::from_formula("FeS").unwrap();
        assert!(corr.correction(&entry).is_err());

        let plain = gga_entry("FeS", -12.0, &["Fe_pv", "S"]);
        assert_eq!(corr.correction(&plain).unwrap(), 0.0);
    }
}
