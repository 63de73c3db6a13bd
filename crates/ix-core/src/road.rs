//! Domain enumerations shared by every crate: roads, lanes, light states and
//! the weather modifier.
//!
//! The two roads are orthogonal and share one intersection region.  Each road
//! has two lanes; each `(road, lane)` pair owns its own cell array.

/// One of the two perpendicular roads.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Road {
    /// Vertical axis (north–south).
    R1,
    /// Horizontal axis (west–east).
    R2,
}

impl Road {
    pub const ALL: [Road; 2] = [Road::R1, Road::R2];

    /// Dense index for array storage.
    #[inline(always)]
    pub fn index(self) -> usize {
        match self {
            Road::R1 => 0,
            Road::R2 => 1,
        }
    }

    /// The crossing road.
    #[inline]
    pub fn other(self) -> Road {
        match self {
            Road::R1 => Road::R2,
            Road::R2 => Road::R1,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Road::R1 => "R1",
            Road::R2 => "R2",
        }
    }
}

impl std::fmt::Display for Road {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One of the two lanes of a road.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Lane {
    Left,
    Right,
}

impl Lane {
    pub const ALL: [Lane; 2] = [Lane::Left, Lane::Right];

    #[inline(always)]
    pub fn index(self) -> usize {
        match self {
            Lane::Left => 0,
            Lane::Right => 1,
        }
    }

    /// The neighbouring lane of the same road.
    #[inline]
    pub fn other(self) -> Lane {
        match self {
            Lane::Left => Lane::Right,
            Lane::Right => Lane::Left,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Lane::Left => "LEFT",
            Lane::Right => "RIGHT",
        }
    }
}

impl std::fmt::Display for Lane {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Traffic-light state of one road.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum LightState {
    Red,
    Green,
}

impl LightState {
    #[inline]
    pub fn flipped(self) -> LightState {
        match self {
            LightState::Red => LightState::Green,
            LightState::Green => LightState::Red,
        }
    }

    #[inline]
    pub fn is_red(self) -> bool {
        matches!(self, LightState::Red)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            LightState::Red => "RED",
            LightState::Green => "GREEN",
        }
    }
}

impl std::fmt::Display for LightState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Global weather condition.  Selects a preset [`ModelParams`][crate::ModelParams]
/// bundle; the engine itself only reads the resulting probabilities.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum Weather {
    #[default]
    Normal,
    Rainy,
}

impl Weather {
    pub fn as_str(self) -> &'static str {
        match self {
            Weather::Normal => "normal",
            Weather::Rainy => "rainy",
        }
    }
}

impl std::fmt::Display for Weather {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
