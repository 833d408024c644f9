/// Expected headcount per unit, in display order.
#[derive(Debug, Clone)]
pub struct TargetTable {
    entries: Vec<(String, u32)>,
}

const PRESET: &[(&str, u32)] = &[
    ("JOHOR", 120),
    ("KEDAH", 80),
    ("KELANTAN", 75),
    ("MELAKA", 45),
    ("NEGERI SEMBILAN", 50),
    ("PAHANG", 70),
    ("PERAK", 95),
    ("PERLIS", 20),
    ("PULAU PINANG", 60),
    ("SABAH", 90),
    ("SARAWAK", 100),
    ("SELANGOR", 150),
    ("TERENGGANU", 65),
    ("WP KUALA LUMPUR", 110),
    ("WP LABUAN", 15),
    ("WP PUTRAJAYA", 40),
];

impl TargetTable {
    pub fn preset() -> Self {
        Self::new(PRESET.iter().map(|(unit, target)| (*unit, *target)))
    }

    /// Unit names are normalized the same way record units are. A repeated
    /// unit keeps its first position and target.
    pub fn new<'a>(entries: impl IntoIterator<Item = (&'a str, u32)>) -> Self {
        let mut table = Self {
            entries: Vec::new(),
        };
        for (unit, target) in entries {
            let unit = normalize_label(unit);
            if table.target_for(&unit).is_none() {
                table.entries.push((unit, target));
            }
        }
        table
    }

    pub fn target_for(&self, unit: &str) -> Option<u32> {
        self.entries
            .iter()
            .find(|(name, _)| name == unit)
            .map(|(_, target)| *target)
    }

    pub fn units(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(unit, _)| unit.as_str())
    }
}

/// Collapses whitespace and upper-cases; used for unit and session labels.
pub fn normalize_label(raw: &str) -> String {
    raw.split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_uppercase()
}
