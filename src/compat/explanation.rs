//! # 修正说明
//!
//! 汇总一个条目的未修正能量、逐条修正和最终能量，并渲染为控制台文本：
//!
//! ```text
//! The uncorrected value of the energy of Li4 Fe4 P4 O16 is -191.338121 eV
//! The following corrections / screening are applied for MaterialsProjectCompatibility:
//!
//! MP Potcar Correction correction: ...
//!
//! For the entry, this correction has the value 0.000000 eV.
//! ------------------------------
//! ...
//! The final energy after corrections is -213.506761
//! ```
//!
//! ## 依赖关系
//! - 被 `compat/compatibility.rs`, `commands/explain.rs` 使用

use super::compatibility::AppliedCorrection;
use crate::models::ComputedEntry;

use serde::Serialize;
use std::fmt;

/// 修正块之间的分隔线
const SEPARATOR_WIDTH: usize = 30;

/// 单个条目的修正说明
#[derive(Debug, Clone, Serialize)]
pub struct Explanation {
    pub compatibility: String,
    pub entry_id: Option<String>,
    pub formula: String,
    pub uncorrected_energy: f64,
    pub corrections: Vec<AppliedCorrection>,
    pub corrected_energy: f64,
}

impl Explanation {
    pub fn new(
        compatibility: &str,
        entry: &ComputedEntry,
        corrections: Vec<AppliedCorrection>,
    ) -> Self {
        let uncorrected_energy = entry.uncorrected_energy();
        let corrected_energy =
            uncorrected_energy + corrections.iter().map(|c| c.value).sum::<f64>();

        Explanation {
            compatibility: compatibility.to_string(),
            entry_id: entry.entry_id.clone(),
            formula: entry.composition.formula(),
            uncorrected_energy,
            corrections,
            corrected_energy,
        }
    }

    /// 修正总和
    pub fn total_correction(&self) -> f64 {
        self.corrected_energy - self.uncorrected_energy
    }
}

impl fmt::Display for Explanation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "The uncorrected value of the energy of {} is {:.6} eV",
            self.formula, self.uncorrected_energy
        )?;
        writeln!(
            f,
            "The following corrections / screening are applied for {}:\n",
            self.compatibility
        )?;

        for c in &self.corrections {
            writeln!(f, "{} correction: {}\n", c.name, c.description)?;
            writeln!(
                f,
                "For the entry, this correction has the value {:.6} eV.",
                c.value
            )?;
            writeln!(f, "{}", "-".repeat(SEPARATOR_WIDTH))?;
        }

        writeln!(
            f,
            "The final energy after corrections is {:.6}",
            self.corrected_energy
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::fixtures::lifepo4_entry;

    fn applied(name: &str, value: f64) -> AppliedCorrection {
        AppliedCorrection {
            name: name.to_string(),
            description: format!("{} description", name),
            value,
        }
    }

    #[test]
    fn test_final_energy_is_sum_of_deltas() {
        let explanation = Explanation::new(
            "MaterialsProjectCompatibility",
            &lifepo4_entry(),
            vec![
                applied("PotcarCorrection", 0.0),
                applied("GasCorrection", -11.236640),
                applied("UCorrection", -10.932000),
            ],
        );

        assert!((explanation.corrected_energy - (-213.506761)).abs() < 1e-9);
        assert!((explanation.total_correction() - (-22.16864)).abs() < 1e-9);
    }

    #[test]
    fn test_render_format() {
        let explanation = Explanation::new(
            "MaterialsProjectCompatibility",
            &lifepo4_entry(),
            vec![applied("GasCorrection", -11.236640)],
        );

        let expected = "\
The uncorrected value of the energy of Li4 Fe4 P4 O16 is -191.338121 eV
The following corrections / screening are applied for MaterialsProjectCompatibility:

GasCorrection correction: GasCorrection description

For the entry, this correction has the value -11.236640 eV.
------------------------------
The final energy after corrections is -202.574761
";
        assert_eq!(explanation.to_string(), expected);
    }

    #[test]
    fn test_render_without_corrections() {
        let explanation = Explanation::new("Empty", &lifepo4_entry(), vec![]);
        let text = explanation.to_string();
        assert!(text.ends_with("The final energy after corrections is -191.338121\n"));
        assert!(!text.contains("------"));
    }
}
