//! 测试用条目

use super::entry::EntryParameters;
use super::{Composition, ComputedEntry};
use std::collections::BTreeMap;

/// LiFePO4（4 个化学式单元）的 GGA+U 条目
pub fn lifepo4_entry() -> ComputedEntry {
    let composition = Composition::from_formula("Li4Fe4P4O16").unwrap();
    let parameters = EntryParameters {
        run_type: Some("GGA+U".to_string()),
        is_hubbard: true,
        hubbards: BTreeMap::from([
            ("Li".to_string(), 0.0),
            ("Fe".to_string(), 5.3),
            ("P".to_string(), 0.0),
            ("O".to_string(), 0.0),
        ]),
        potcar_symbols: vec![
            "PAW_PBE Li_sv 17Jan2003".to_string(),
            "PAW_PBE Fe_pv 06Sep2000".to_string(),
            "PAW_PBE P 17Jan2003".to_string(),
            "PAW_PBE O 08Apr2002".to_string(),
        ],
    };

    ComputedEntry::new(composition, -191.338121)
        .with_id("mp-19017")
        .with_parameters(parameters)
        .with_data("oxide_type", serde_json::json!("oxide"))
}

/// 不含 U 的 GGA 条目
pub fn gga_entry(formula: &str, energy: f64, potcars: &[&str]) -> ComputedEntry {
    let parameters = EntryParameters {
        run_type: Some("GGA".to_string()),
        is_hubbard: false,
        hubbards: BTreeMap::new(),
        potcar_symbols: potcars.iter().map(|p| format!("PAW_PBE {}", p)).collect(),
    };
    ComputedEntry::new(Composition::from_formula(formula).unwrap(), energy)
        .with_parameters(parameters)
}
