// src/units.rs
// Byte count conversion used by every statistics display.

/// Index used when nothing else is configured (megabytes).
pub const DEFAULT_UNIT: usize = 5;

/// Display units, in selector order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Unit {
    Bits,
    Bytes,
    Kilobits,
    Kilobytes,
    Megabits,
    Megabytes,
    Gigabits,
    Gigabytes,
}

impl Unit {
    pub const ALL: [Unit; 8] = [
        Unit::Bits,
        Unit::Bytes,
        Unit::Kilobits,
        Unit::Kilobytes,
        Unit::Megabits,
        Unit::Megabytes,
        Unit::Gigabits,
        Unit::Gigabytes,
    ];

    pub fn from_index(index: usize) -> Option<Unit> {
        Self::ALL.get(index).copied()
    }

    pub fn index(self) -> usize {
        self as usize
    }

    /// Next unit in selector order, wrapping around.
    pub fn next(self) -> Unit {
        Self::ALL[(self.index() + 1) % Self::ALL.len()]
    }

    pub fn label(self) -> &'static str {
        match self {
            Unit::Bits => "bit",
            Unit::Bytes => "B",
            Unit::Kilobits => "Kbit",
            Unit::Kilobytes => "KB",
            Unit::Megabits => "Mbit",
            Unit::Megabytes => "MB",
            Unit::Gigabits => "Gbit",
            Unit::Gigabytes => "GB",
        }
    }

    fn factor(self) -> f64 {
        const K: f64 = 1024.0;
        match self {
            Unit::Bits => 8.0,
            Unit::Bytes => 1.0,
            Unit::Kilobits => 8.0 / K,
            Unit::Kilobytes => 1.0 / K,
            Unit::Megabits => 8.0 / (K * K),
            Unit::Megabytes => 1.0 / (K * K),
            Unit::Gigabits => 8.0 / (K * K * K),
            Unit::Gigabytes => 1.0 / (K * K * K),
        }
    }
}

/// Convert a byte count into the unit at `unit_index`.
/// Unknown indices yield `0.0`.
pub fn convert(bytes: f64, unit_index: usize) -> f64 {
    match Unit::from_index(unit_index) {
        Some(unit) => bytes * unit.factor(),
        None => 0.0,
    }
}
