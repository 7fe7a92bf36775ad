//! # 元素周期表
//!
//! 提供元素符号、原子序数和 Pauling 电负性的静态查询表。
//!
//! ## 依赖关系
//! - 被 `models/composition.rs` 使用
//! - 无外部模块依赖

/// 无 Pauling 电负性的元素（He, Ne, Ar）使用的占位值，排序时位于最后
pub const NO_ELECTRONEGATIVITY: f64 = f64::INFINITY;

/// 元素信息
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Element {
    /// 元素符号
    pub symbol: &'static str,
    /// 原子序数
    pub z: u32,
    /// Pauling 电负性
    pub x: f64,
}

impl Element {
    /// 根据符号查找元素（区分大小写）
    pub fn from_symbol(symbol: &str) -> Option<&'static Element> {
        PERIODIC_TABLE.iter().find(|e| e.symbol == symbol)
    }

    /// 是否为有效元素符号
    pub fn is_valid(symbol: &str) -> bool {
        Self::from_symbol(symbol).is_some()
    }

    /// 是否有 Pauling 电负性
    pub fn has_electronegativity(&self) -> bool {
        self.x.is_finite()
    }
}

/// 原子序数，未知元素为 0
pub fn atomic_number(symbol: &str) -> u32 {
    Element::from_symbol(symbol).map(|e| e.z).unwrap_or(0)
}

/// 获取元素电负性，未知元素视为无电负性
pub fn electronegativity(symbol: &str) -> f64 {
    Element::from_symbol(symbol)
        .map(|e| e.x)
        .unwrap_or(NO_ELECTRONEGATIVITY)
}

macro_rules! el {
    ($sym:literal, $z:literal, $x:expr) => {
        Element {
            symbol: $sym,
            z: $z,
            x: $x,
        }
    };
}

const NA: f64 = NO_ELECTRONEGATIVITY;

static PERIODIC_TABLE: [Element; 94] = [
    el!("H", 1, 2.20),
    el!("He", 2, NA),
    el!("Li", 3, 0.98),
    el!("Be", 4, 1.57),
    el!("B", 5, 2.04),
    el!("C", 6, 2.55),
    el!("N", 7, 3.04),
    el!("O", 8, 3.44),
    el!("F", 9, 3.98),
    el!("Ne", 10, NA),
    el!("Na", 11, 0.93),
    el!("Mg", 12, 1.31),
    el!("Al", 13, 1.61),
    el!("Si", 14, 1.90),
    el!("P", 15, 2.19),
    el!("S", 16, 2.58),
    el!("Cl", 17, 3.16),
    el!("Ar", 18, NA),
    el!("K", 19, 0.82),
    el!("Ca", 20, 1.00),
    el!("Sc", 21, 1.36),
    el!("Ti", 22, 1.54),
    el!("V", 23, 1.63),
    el!("Cr", 24, 1.66),
    el!("Mn", 25, 1.55),
    el!("Fe", 26, 1.83),
    el!("Co", 27, 1.88),
    el!("Ni", 28, 1.91),
    el!("Cu", 29, 1.90),
    el!("Zn", 30, 1.65),
    el!("Ga", 31, 1.81),
    el!("Ge", 32, 2.01),
    el!("As", 33, 2.18),
    el!("Se", 34, 2.55),
    el!("Br", 35, 2.96),
    el!("Kr", 36, 3.00),
    el!("Rb", 37, 0.82),
    el!("Sr", 38, 0.95),
    el!("Y", 39, 1.22),
    el!("Zr", 40, 1.33),
    el!("Nb", 41, 1.60),
    el!("Mo", 42, 2.16),
    el!("Tc", 43, 1.90),
    el!("Ru", 44, 2.20),
    el!("Rh", 45, 2.28),
    el!("Pd", 46, 2.20),
    el!("Ag", 47, 1.93),
    el!("Cd", 48, 1.69),
    el!("In", 49, 1.78),
    el!("Sn", 50, 1.96),
    el!("Sb", 51, 2.05),
    el!("Te", 52, 2.10),
    el!("I", 53, 2.66),
    el!("Xe", 54, 2.60),
    el!("Cs", 55, 0.79),
    el!("Ba", 56, 0.89),
    el!("La", 57, 1.10),
    el!("Ce", 58, 1.12),
    el!("Pr", 59, 1.13),
    el!("Nd", 60, 1.14),
    el!("Pm", 61, 1.13),
    el!("Sm", 62, 1.17),
    el!("Eu", 63, 1.20),
    el!("Gd", 64, 1.20),
    el!("Tb", 65, 1.10),
    el!("Dy", 66, 1.22),
    el!("Ho", 67, 1.23),
    el!("Er", 68, 1.24),
    el!("Tm", 69, 1.25),
    el!("Yb", 70, 1.10),
    el!("Lu", 71, 1.27),
    el!("Hf", 72, 1.30),
    el!("Ta", 73, 1.50),
    el!("W", 74, 2.36),
    el!("Re", 75, 1.90),
    el!("Os", 76, 2.20),
    el!("Ir", 77, 2.20),
    el!("Pt", 78, 2.28),
    el!("Au", 79, 2.54),
    el!("Hg", 80, 2.00),
    el!("Tl", 81, 1.62),
    el!("Pb", 82, 2.33),
    el!("Bi", 83, 2.02),
    el!("Po", 84, 2.00),
    el!("At", 85, 2.20),
    el!("Rn", 86, 2.20),
    el!("Fr", 87, 0.70),
    el!("Ra", 88, 0.90),
    el!("Ac", 89, 1.10),
    el!("Th", 90, 1.30),
    el!("Pa", 91, 1.50),
    el!("U", 92, 1.38),
    el!("Np", 93, 1.36),
    el!("Pu", 94, 1.28),
];
