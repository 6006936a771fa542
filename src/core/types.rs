use serde::{Deserialize, Serialize};

/// Simulated time, in abstract time units
pub type SimTime = f64;

/// Identifier of a logical process (arrival generator or assembly unit)
pub type ProcessId = u64;

/// Index of a workstation on the line, 0..STATION_COUNT
pub type StationId = usize;

pub const STATION_COUNT: usize = 6;

/// Material types consumed along the line, one per assembly step.
///
/// Declaration order is step order and also the ordering used by
/// every material-keyed map in the metrics snapshot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Material {
    BaseCircuits,
    Microcontrollers,
    LedDisplays,
    Case,
    WaterSealant,
    Batteries,
}

impl Material {
    pub const ALL: [Material; 6] = [
        Material::BaseCircuits,
        Material::Microcontrollers,
        Material::LedDisplays,
        Material::Case,
        Material::WaterSealant,
        Material::Batteries,
    ];

    /// Snake-case name, as it appears in snapshots and exported tables
    pub fn name(&self) -> &'static str {
        match self {
            Material::BaseCircuits => "base_circuits",
            Material::Microcontrollers => "microcontrollers",
            Material::LedDisplays => "led_displays",
            Material::Case => "case",
            Material::WaterSealant => "water_sealant",
            Material::Batteries => "batteries",
        }
    }

    /// Title-cased name with underscores turned into spaces
    pub fn display_name(&self) -> String {
        self.name()
            .split('_')
            .map(|word| {
                let mut chars = word.chars();
                match chars.next() {
                    Some(first) => first.to_uppercase().chain(chars).collect::<String>(),
                    None => String::new(),
                }
            })
            .collect::<Vec<_>>()
            .join(" ")
    }

    pub fn index(&self) -> usize {
        *self as usize
    }
}

impl std::fmt::Display for Material {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Human-readable station names, indexed by station id
pub const STATION_NAMES: [&str; STATION_COUNT] = [
    "Circuit Preparation",
    "Microcontroller Integration",
    "LED Display Assembly",
    "Case Assembly",
    "Water Sealing",
    "Testing & Packaging",
];
