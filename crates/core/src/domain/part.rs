use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PartCategory {
    Cpu,
    Motherboard,
    Gpu,
    Memory,
    Ssd,
    PowerSupply,
    Case,
}

impl PartCategory {
    /// Every mandatory category, in the order they are searched and presented.
    pub const ALL: [PartCategory; 7] = [
        PartCategory::Cpu,
        PartCategory::Motherboard,
        PartCategory::Gpu,
        PartCategory::Memory,
        PartCategory::Ssd,
        PartCategory::PowerSupply,
        PartCategory::Case,
    ];

    /// Label used in the prompt block, the `part` field, and the LLM output.
    pub fn label(self) -> &'static str {
        match self {
            PartCategory::Cpu => "CPU",
            PartCategory::Motherboard => "메인보드",
            PartCategory::Gpu => "그래픽카드",
            PartCategory::Memory => "메모리",
            PartCategory::Ssd => "SSD",
            PartCategory::PowerSupply => "파워서플라이",
            PartCategory::Case => "케이스",
        }
    }

    pub fn search_term(self) -> &'static str {
        match self {
            PartCategory::Cpu => "데스크탑 CPU",
            PartCategory::Motherboard => "데스크탑 메인보드",
            PartCategory::Gpu => "그래픽카드",
            PartCategory::Memory => "데스크탑 메모리",
            PartCategory::Ssd => "SSD",
            PartCategory::PowerSupply => "파워서플라이",
            PartCategory::Case => "PC 케이스",
        }
    }

    /// Product substituted when the live search yields nothing.
    pub fn fallback_product_name(self) -> &'static str {
        match self {
            PartCategory::Cpu => "AMD 라이젠 5 5600X",
            PartCategory::Motherboard => "ASUS PRIME B550M-A",
            PartCategory::Gpu => "NVIDIA GeForce RTX 3060",
            PartCategory::Memory => "삼성전자 DDR4 16GB",
            PartCategory::Ssd => "삼성전자 970 EVO Plus 500GB",
            PartCategory::PowerSupply => "마이크로닉스 Classic II 600W",
            PartCategory::Case => "ABKO NCORE 식스팬 풀 아크릴 LUNAR",
        }
    }

    /// Title substrings that mark accessories or unrelated goods for this category.
    pub fn excluded_keywords(self) -> &'static [&'static str] {
        match self {
            PartCategory::Cpu => &["쿨러", "cooler", "서멀", "thermal"],
            PartCategory::Motherboard => &["브라켓", "bracket", "백패널"],
            PartCategory::Gpu => &["브라켓", "bracket", "지지대", "라이저", "riser"],
            PartCategory::Memory => &["노트북용", "방열판", "heatsink"],
            PartCategory::Ssd => &["케이스", "인클로저", "enclosure", "방열판", "heatsink"],
            PartCategory::PowerSupply => &["케이블", "cable", "연장"],
            PartCategory::Case => &["케이스 팬", "받침대", "스탠드", "stand"],
        }
    }

    pub fn from_label(label: &str) -> Option<Self> {
        let label = label.trim();
        Self::ALL
            .into_iter()
            .find(|c| c.label().eq_ignore_ascii_case(label))
    }
}
