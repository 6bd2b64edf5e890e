use std::ops::{Index, IndexMut, RangeInclusive};
use std::str::FromStr;

use anyhow::{bail, Result};
use serde::ser::SerializeMap;
use serde::{Deserialize, Serialize, Serializer};

/// Position physique sur la roue, 0..=53.
pub type Segment = u8;

pub const SEGMENT_COUNT: usize = 54;
pub const ZONE_COUNT: usize = 6;
pub const ZONE_WIDTH: usize = SEGMENT_COUNT / ZONE_COUNT;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Outcome {
    #[serde(rename = "1")]
    One,
    #[serde(rename = "2")]
    Two,
    #[serde(rename = "5")]
    Five,
    #[serde(rename = "10")]
    Ten,
    #[serde(rename = "2_rolls")]
    TwoRolls,
    #[serde(rename = "4_rolls")]
    FourRolls,
    #[serde(rename = "chance")]
    Chance,
}

impl Outcome {
    pub const ALL: [Outcome; 7] = [
        Outcome::One,
        Outcome::Two,
        Outcome::Five,
        Outcome::Ten,
        Outcome::TwoRolls,
        Outcome::FourRolls,
        Outcome::Chance,
    ];

    /// Le seul résultat dont la fréquence récente porte de la « chaleur ».
    pub const TARGET: Outcome = Outcome::One;

    pub fn token(&self) -> &'static str {
        match self {
            Outcome::One => "1",
            Outcome::Two => "2",
            Outcome::Five => "5",
            Outcome::Ten => "10",
            Outcome::TwoRolls => "2_rolls",
            Outcome::FourRolls => "4_rolls",
            Outcome::Chance => "chance",
        }
    }

    /// Correspondance exacte sur l'alphabet fermé, sans normalisation.
    pub fn from_token(token: &str) -> Option<Outcome> {
        Outcome::ALL.iter().copied().find(|o| o.token() == token)
    }

    pub fn is_target(&self) -> bool {
        *self == Outcome::TARGET
    }

    pub fn has_betting_value(&self) -> bool {
        *self != Outcome::Chance
    }
}

impl FromStr for Outcome {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match Outcome::from_token(s) {
            Some(outcome) => Ok(outcome),
            None => bail!("Résultat inconnu : {:?}", s),
        }
    }
}

impl std::fmt::Display for Outcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.token())
    }
}

/// Disposition statique de la roue, segment 0 en tête.
/// Nombre de `1` par tranche de 9 : 4, 3, 4, 3, 4, 4.
pub const WHEEL_LAYOUT: [Outcome; SEGMENT_COUNT] = {
    use Outcome::*;
    [
        // A : 0..=8
        One, Two, One, Five, One, Ten, One, Two, Chance,
        // B : 9..=17
        TwoRolls, One, Two, Five, One, Two, Ten, One, Two,
        // C : 18..=26
        One, Five, One, Two, One, FourRolls, One, Two, Five,
        // D : 27..=35
        Two, One, Ten, Two, One, Five, TwoRolls, One, Two,
        // E : 36..=44
        One, Two, One, Chance, One, Five, One, Two, Ten,
        // F : 45..=53
        One, Two, One, Five, One, TwoRolls, One, Two, Two,
    ]
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Zone {
    A,
    B,
    C,
    D,
    E,
    F,
}

/// Nombre de segments `1` par zone, dans l'ordre canonique A → F.
pub const ZONE_DENSITIES: [u32; ZONE_COUNT] = [4, 3, 4, 3, 4, 4];

impl Zone {
    /// Ordre canonique, utilisé pour toutes les itérations et départages.
    pub const ALL: [Zone; ZONE_COUNT] = [Zone::A, Zone::B, Zone::C, Zone::D, Zone::E, Zone::F];

    pub fn index(&self) -> usize {
        *self as usize
    }

    pub fn letter(&self) -> char {
        match self {
            Zone::A => 'A',
            Zone::B => 'B',
            Zone::C => 'C',
            Zone::D => 'D',
            Zone::E => 'E',
            Zone::F => 'F',
        }
    }

    pub fn segments(&self) -> RangeInclusive<Segment> {
        let start = (self.index() * ZONE_WIDTH) as Segment;
        start..=start + (ZONE_WIDTH as Segment - 1)
    }

    pub fn containing(segment: Segment) -> Option<Zone> {
        let idx = segment as usize / ZONE_WIDTH;
        Zone::ALL.get(idx).copied()
    }
}

impl std::fmt::Display for Zone {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.letter())
    }
}

/// Table à exactement six entrées, une par zone.
#[derive(Debug, Clone, PartialEq)]
pub struct ZoneMap<T> {
    values: [T; ZONE_COUNT],
}

impl<T> ZoneMap<T> {
    pub fn from_fn<F: FnMut(Zone) -> T>(mut f: F) -> Self {
        Self {
            values: std::array::from_fn(|i| f(Zone::ALL[i])),
        }
    }

    pub fn from_array(values: [T; ZONE_COUNT]) -> Self {
        Self { values }
    }

    pub fn iter(&self) -> impl Iterator<Item = (Zone, &T)> + '_ {
        Zone::ALL.iter().copied().zip(self.values.iter())
    }

    pub fn values(&self) -> &[T; ZONE_COUNT] {
        &self.values
    }

    pub fn map<U, F: FnMut(Zone, &T) -> U>(&self, mut f: F) -> ZoneMap<U> {
        ZoneMap::from_fn(|zone| f(zone, &self.values[zone.index()]))
    }
}

impl<T: Default> Default for ZoneMap<T> {
    fn default() -> Self {
        Self::from_fn(|_| T::default())
    }
}

impl<T> Index<Zone> for ZoneMap<T> {
    type Output = T;

    fn index(&self, zone: Zone) -> &T {
        &self.values[zone.index()]
    }
}

impl<T> IndexMut<Zone> for ZoneMap<T> {
    fn index_mut(&mut self, zone: Zone) -> &mut T {
        &mut self.values[zone.index()]
    }
}

impl<T: Serialize> Serialize for ZoneMap<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(ZONE_COUNT))?;
        for (zone, value) in self.iter() {
            map.serialize_entry(&zone, value)?;
        }
        map.end()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TrendDirection {
    Up,
    Down,
    Stable,
}

impl std::fmt::Display for TrendDirection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TrendDirection::Up => write!(f, "up"),
            TrendDirection::Down => write!(f, "down"),
            TrendDirection::Stable => write!(f, "stable"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ShiftStatus {
    Hot,
    Warming,
    Cooling,
    Cold,
}

impl ShiftStatus {
    pub fn is_favorable(&self) -> bool {
        matches!(self, ShiftStatus::Hot | ShiftStatus::Warming)
    }
}

impl std::fmt::Display for ShiftStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ShiftStatus::Hot => write!(f, "HOT"),
            ShiftStatus::Warming => write!(f, "WARMING"),
            ShiftStatus::Cooling => write!(f, "COOLING"),
            ShiftStatus::Cold => write!(f, "COLD"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Confidence {
    Medium,
    High,
}

impl std::fmt::Display for Confidence {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Confidence::Medium => write!(f, "medium"),
            Confidence::High => write!(f, "high"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Action {
    Bet,
    Consider,
    Skip,
}

impl std::fmt::Display for Action {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Action::Bet => write!(f, "bet"),
            Action::Consider => write!(f, "consider"),
            Action::Skip => write!(f, "skip"),
        }
    }
}
