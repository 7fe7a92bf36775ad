//! # 化学组成数据模型
//!
//! 元素 → 原子数映射，支持化学式解析、约化化学式和电负性排序。
//!
//! ## 依赖关系
//! - 被 `models/entry.rs`, `client/`, `compat/` 使用
//! - 使用 `models/element.rs`

use super::element::{atomic_number, electronegativity, Element};
use crate::error::{MpCompatError, Result};

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::collections::BTreeMap;
use std::fmt;
use std::sync::OnceLock;

/// 判断数值为整数的容差
const AMOUNT_TOLERANCE: f64 = 1e-8;

/// 双原子气体与过氧化物的约化化学式
const SPECIAL_FORMULAS: &[(&str, &str)] = &[
    ("LiO", "Li2O2"),
    ("NaO", "Na2O2"),
    ("KO", "K2O2"),
    ("HO", "H2O2"),
    ("CsO", "Cs2O2"),
    ("RbO", "Rb2O2"),
    ("O", "O2"),
    ("N", "N2"),
    ("F", "F2"),
    ("Cl", "Cl2"),
    ("H", "H2"),
];

/// 化学组成
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(try_from = "BTreeMap<String, f64>", into = "BTreeMap<String, f64>")]
pub struct Composition {
    amounts: BTreeMap<String, f64>,
}

impl Composition {
    /// 从元素 → 数量映射创建，忽略数量为零的元素
    pub fn from_map(map: BTreeMap<String, f64>) -> Result<Self> {
        let mut amounts = BTreeMap::new();
        for (symbol, amount) in map {
            if !Element::is_valid(&symbol) {
                return Err(MpCompatError::UnknownElement(symbol));
            }
            if amount < 0.0 || !amount.is_finite() {
                return Err(MpCompatError::InvalidFormula(format!(
                    "{} has invalid amount {}",
                    symbol, amount
                )));
            }
            if amount > AMOUNT_TOLERANCE {
                amounts.insert(symbol, amount);
            }
        }
        Ok(Composition { amounts })
    }

    /// 解析化学式，如 `Fe2O3`, `Ca(OH)2`, `Li4 Fe4 P4 O16`
    pub fn from_formula(formula: &str) -> Result<Self> {
        let compact: String = formula.split_whitespace().collect();
        if compact.is_empty() {
            return Err(MpCompatError::InvalidFormula(formula.to_string()));
        }

        let keep_unknown = |e: MpCompatError| match e {
            MpCompatError::UnknownElement(_) => e,
            _ => invalid(formula),
        };
        let expanded = expand_groups(&compact).map_err(keep_unknown)?;
        let map = parse_flat(&expanded).map_err(keep_unknown)?;

        let comp = Self::from_map(map)?;
        if comp.is_empty() {
            return Err(invalid(formula));
        }
        Ok(comp)
    }

    /// 总原子数
    pub fn num_atoms(&self) -> f64 {
        self.amounts.values().sum()
    }

    /// 元素数量（不存在时为 0）
    pub fn amount(&self, symbol: &str) -> f64 {
        self.amounts.get(symbol).copied().unwrap_or(0.0)
    }

    pub fn contains(&self, symbol: &str) -> bool {
        self.amounts.contains_key(symbol)
    }

    /// 元素种类数
    pub fn len(&self) -> usize {
        self.amounts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.amounts.is_empty()
    }

    /// 元素符号（按字母序）
    pub fn elements(&self) -> impl Iterator<Item = &str> {
        self.amounts.keys().map(|s| s.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, f64)> {
        self.amounts.iter().map(|(s, a)| (s.as_str(), *a))
    }

    /// 按电负性升序排列的 (元素, 数量)，电负性相同时按符号排序
    pub fn sorted_by_electronegativity(&self) -> Vec<(&str, f64)> {
        let mut items: Vec<(&str, f64)> = self.iter().collect();
        items.sort_by(|a, b| compare_electronegativity(a.0, b.0));
        items
    }

    /// 电负性最高的元素，不考虑没有 Pauling 电负性的元素
    pub fn most_electronegative(&self) -> Option<&str> {
        self.sorted_by_electronegativity()
            .into_iter()
            .rev()
            .map(|(s, _)| s)
            .find(|s| Element::from_symbol(s).is_some_and(Element::has_electronegativity))
    }

    /// 带空格的完整化学式，如 `Li4 Fe4 P4 O16`、`Li1 Fe1 P1 O4`
    pub fn formula(&self) -> String {
        self.sorted_by_electronegativity()
            .into_iter()
            .map(|(el, amt)| format!("{}{}", el, format_amount(amt, false)))
            .collect::<Vec<_>>()
            .join(" ")
    }

    /// 约化化学式，如 `LiFePO4`；双原子气体和过氧化物保持分子形式（`O2`, `Li2O2`）
    pub fn reduced_formula(&self) -> String {
        let factor = self.reduction_factor();
        let reduced: String = self
            .sorted_by_electronegativity()
            .into_iter()
            .map(|(el, amt)| format!("{}{}", el, format_amount(amt / factor, true)))
            .collect();

        SPECIAL_FORMULAS
            .iter()
            .find(|(plain, _)| *plain == reduced)
            .map(|(_, special)| special.to_string())
            .unwrap_or(reduced)
    }

    /// 约化因子：所有数量均为整数时取最大公约数，否则为 1
    fn reduction_factor(&self) -> f64 {
        let mut divisor: u64 = 0;
        for amt in self.amounts.values() {
            if (amt - amt.round()).abs() > AMOUNT_TOLERANCE {
                return 1.0;
            }
            divisor = gcd(divisor, amt.round() as u64);
        }
        if divisor == 0 {
            1.0
        } else {
            divisor as f64
        }
    }
}

impl fmt::Display for Composition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.formula())
    }
}

impl TryFrom<BTreeMap<String, f64>> for Composition {
    type Error = MpCompatError;

    fn try_from(map: BTreeMap<String, f64>) -> Result<Self> {
        Composition::from_map(map)
    }
}

impl From<Composition> for BTreeMap<String, f64> {
    fn from(comp: Composition) -> Self {
        comp.amounts
    }
}

fn invalid(formula: &str) -> MpCompatError {
    MpCompatError::InvalidFormula(formula.to_string())
}

fn compare_electronegativity(a: &str, b: &str) -> Ordering {
    electronegativity(a)
        .partial_cmp(&electronegativity(b))
        .unwrap_or(Ordering::Equal)
        .then_with(|| atomic_number(a).cmp(&atomic_number(b)))
        .then_with(|| a.cmp(b))
}

fn gcd(a: u64, b: u64) -> u64 {
    if b == 0 {
        a
    } else {
        gcd(b, a % b)
    }
}

/// 数量格式化：整数输出为整数，`ignore_ones` 时省略 1
fn format_amount(amount: f64, ignore_ones: bool) -> String {
    if (amount - amount.round()).abs() < AMOUNT_TOLERANCE {
        let n = amount.round() as i64;
        if ignore_ones && n == 1 {
            String::new()
        } else {
            n.to_string()
        }
    } else {
        let s = format!("{:.8}", amount);
        s.trim_end_matches('0').trim_end_matches('.').to_string()
    }
}

fn group_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\(([^()]*)\)(\d*\.?\d*)").expect("valid group regex"))
}

fn token_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"([A-Z][a-z]*)(\d*\.?\d*)").expect("valid token regex"))
}

/// 展开括号分组：`Ca(OH)2` → `CaO2H2`
fn expand_groups(formula: &str) -> Result<String> {
    let mut current = formula.to_string();

    while let Some(caps) = group_regex().captures(&current) {
        let whole = caps.get(0).map(|m| m.range()).unwrap_or(0..0);
        let multiplier = parse_amount(&caps[2])?;
        let inner = parse_flat(&caps[1])?;

        let replacement: String = inner
            .iter()
            .map(|(el, amt)| format!("{}{}", el, amt * multiplier))
            .collect();
        current.replace_range(whole, &replacement);
    }

    if current.contains('(') || current.contains(')') {
        return Err(invalid(formula));
    }
    Ok(current)
}

/// 解析不含括号的化学式
fn parse_flat(formula: &str) -> Result<BTreeMap<String, f64>> {
    let mut map: BTreeMap<String, f64> = BTreeMap::new();
    let mut consumed = 0;

    for caps in token_regex().captures_iter(formula) {
        let Some(whole) = caps.get(0) else { continue };
        if whole.start() != consumed {
            return Err(invalid(formula));
        }
        consumed = whole.end();

        let symbol = &caps[1];
        if !Element::is_valid(symbol) {
            return Err(MpCompatError::UnknownElement(symbol.to_string()));
        }
        *map.entry(symbol.to_string()).or_insert(0.0) += parse_amount(&caps[2])?;
    }

    if consumed != formula.len() {
        return Err(invalid(formula));
    }
    Ok(map)
}

fn parse_amount(s: &str) -> Result<f64> {
    if s.is_empty() {
        return Ok(1.0);
    }
    s.parse::<f64>().map_err(|_| invalid(s))
}
