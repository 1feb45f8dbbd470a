use serde::{Deserialize, Serialize};

pub const LEVEL_COUNT: usize = 11;
pub const UNSET: i64 = -1;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum LimitBreak {
    #[serde(rename = "0lb")]
    Zero,
    #[serde(rename = "1lb")]
    One,
    #[serde(rename = "2lb")]
    Two,
    #[serde(rename = "3lb")]
    Three,
    #[serde(rename = "mlb")]
    Max,
}

impl LimitBreak {
    pub const ALL: [LimitBreak; 5] = [
        LimitBreak::Zero,
        LimitBreak::One,
        LimitBreak::Two,
        LimitBreak::Three,
        LimitBreak::Max,
    ];

    pub fn index(self) -> usize {
        match self {
            LimitBreak::Zero => 0,
            LimitBreak::One => 1,
            LimitBreak::Two => 2,
            LimitBreak::Three => 3,
            LimitBreak::Max => 4,
        }
    }

    pub fn from_index(index: usize) -> Option<Self> {
        Self::ALL.get(index).copied()
    }

    pub fn key(self) -> &'static str {
        match self {
            LimitBreak::Zero => "0lb",
            LimitBreak::One => "1lb",
            LimitBreak::Two => "2lb",
            LimitBreak::Three => "3lb",
            LimitBreak::Max => "mlb",
        }
    }

    pub fn from_key(key: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|lb| lb.key() == key.trim())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TierValues {
    #[serde(rename = "0lb")]
    pub lb0: f64,
    #[serde(rename = "1lb")]
    pub lb1: f64,
    #[serde(rename = "2lb")]
    pub lb2: f64,
    #[serde(rename = "3lb")]
    pub lb3: f64,
    pub mlb: f64,
}

impl TierValues {
    pub const UNSET: f64 = UNSET as f64;

    pub fn from_array(values: [f64; 5]) -> Self {
        Self {
            lb0: values[0],
            lb1: values[1],
            lb2: values[2],
            lb3: values[3],
            mlb: values[4],
        }
    }

    pub fn to_array(self) -> [f64; 5] {
        [self.lb0, self.lb1, self.lb2, self.lb3, self.mlb]
    }

    pub fn get(&self, lb: LimitBreak) -> f64 {
        self.to_array()[lb.index()]
    }

    pub fn with(self, lb: LimitBreak, value: f64) -> Self {
        let mut values = self.to_array();
        values[lb.index()] = value;
        Self::from_array(values)
    }
}

impl Default for TierValues {
    fn default() -> Self {
        Self::from_array([Self::UNSET; 5])
    }
}

/// Unknown ranks before the first known value stay unset, gaps between two
/// known values are interpolated with floor division and ranks after the last
/// known value repeat it.
pub fn interpolate_levels(values: &[i64]) -> Vec<i64> {
    let known: Vec<(usize, i64)> = values
        .iter()
        .copied()
        .enumerate()
        .filter(|(_, value)| *value != UNSET)
        .collect();
    let Some(&(first_idx, _)) = known.first() else {
        return vec![UNSET; values.len()];
    };

    values
        .iter()
        .enumerate()
        .map(|(idx, &value)| {
            if value != UNSET {
                return value;
            }
            if idx < first_idx {
                return UNSET;
            }
            let prev = known.iter().rev().find(|(known_idx, _)| *known_idx < idx);
            let next = known.iter().find(|(known_idx, _)| *known_idx > idx);
            match (prev, next) {
                (Some(&(i0, v0)), Some(&(i1, v1))) => {
                    let span = (i1 - i0) as i64;
                    v0 + ((v1 - v0) * (idx - i0) as i64).div_euclid(span)
                }
                (Some(&(_, v0)), None) => v0,
                (None, Some(&(_, v1))) => v1,
                (None, None) => UNSET,
            }
        })
        .collect()
}

fn window_start(rarity: u8) -> Option<usize> {
    match rarity {
        1 => Some(4),
        2 => Some(5),
        3 => Some(6),
        _ => None,
    }
}

pub fn tier_window(rarity: u8, interpolated: &[i64]) -> Option<TierValues> {
    let start = window_start(rarity)?;
    let window = interpolated.get(start..start + 5)?;
    let mut values = [TierValues::UNSET; 5];
    for (slot, value) in values.iter_mut().zip(window) {
        *slot = *value as f64;
    }
    Some(TierValues::from_array(values))
}

/// Maps the card level a unique effect unlocks at to the limit break that
/// first reaches it.
pub fn unique_unlock_tier(rarity: u8, level: i64) -> Option<LimitBreak> {
    let first_level = match rarity {
        1 => 20,
        2 => 25,
        3 => 30,
        _ => return None,
    };
    let offset = level - first_level;
    if offset < 0 || offset % 5 != 0 {
        return None;
    }
    LimitBreak::from_index((offset / 5) as usize)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn interpolates_between_anchors_with_floor_division() {
        let table = [-1, -1, 10, -1, -1, 20, -1, -1, -1, -1, -1];
        let out = interpolate_levels(&table);
        assert_eq!(out, vec![-1, -1, 10, 13, 16, 20, 20, 20, 20, 20, 20]);
    }

    #[test]
    fn all_unset_stays_unset() {
        assert_eq!(interpolate_levels(&[-1; LEVEL_COUNT]), vec![-1; LEVEL_COUNT]);
    }

    #[test]
    fn decreasing_tables_floor_toward_negative_infinity() {
        let out = interpolate_levels(&[10, -1, -1, 0]);
        // 10 + (-10 * 1) // 3 = 10 - 4
        assert_eq!(out, vec![10, 6, 3, 0]);
    }

    #[test]
    fn window_depends_on_rarity() {
        let table: Vec<i64> = (0..LEVEL_COUNT as i64).collect();
        let r1 = tier_window(1, &table).expect("rarity 1");
        assert_eq!(r1.to_array(), [4.0, 5.0, 6.0, 7.0, 8.0]);
        let r3 = tier_window(3, &table).expect("rarity 3");
        assert_eq!(r3.get(LimitBreak::Zero), 6.0);
        assert_eq!(r3.get(LimitBreak::Max), 10.0);
        assert!(tier_window(4, &table).is_none());
    }

    #[test]
    fn unique_unlock_levels_map_per_rarity() {
        assert_eq!(unique_unlock_tier(1, 20), Some(LimitBreak::Zero));
        assert_eq!(unique_unlock_tier(2, 35), Some(LimitBreak::Two));
        assert_eq!(unique_unlock_tier(3, 50), Some(LimitBreak::Max));
        assert_eq!(unique_unlock_tier(3, 25), None);
        assert_eq!(unique_unlock_tier(3, 55), None);
        assert_eq!(unique_unlock_tier(2, 27), None);
    }

    #[test]
    fn limit_break_keys_round_trip() {
        for lb in LimitBreak::ALL {
            assert_eq!(LimitBreak::from_key(lb.key()), Some(lb));
        }
        assert_eq!(LimitBreak::from_key("none"), None);
    }
}
