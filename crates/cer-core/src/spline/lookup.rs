// crates/cer-core/src/spline/lookup.rs
//
// Strategies for finding the nearest bones to either side of a position.
// All of them answer identically; they trade memory for lookup time.

/// Selects how neighbouring bones are located.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum BoneLookup {
    /// Walk the bone array outward from the query.
    Scan,
    /// Per-position record of the nearest bone on each side.
    #[default]
    NearbyLocation,
    /// Per-position distance to the nearest bone, followed by jumps.
    Distance,
}

const NONE: usize = usize::MAX;

#[derive(Clone, Debug)]
pub(crate) enum BoneIndex {
    Scan,
    Nearby {
        /// nearest bone at a position <= i
        left: Vec<usize>,
        /// nearest bone at a position >= i
        right: Vec<usize>,
    },
    Distance {
        dist: Vec<u64>,
    },
}

impl BoneIndex {
    pub(crate) fn new(policy: BoneLookup, len: usize) -> Self {
        match policy {
            BoneLookup::Scan => BoneIndex::Scan,
            BoneLookup::NearbyLocation => BoneIndex::Nearby {
                left: vec![NONE; len],
                right: vec![NONE; len],
            },
            BoneLookup::Distance => BoneIndex::Distance {
                dist: vec![u64::MAX; len],
            },
        }
    }

    /// Record a new bone at `x`.
    pub(crate) fn insert(&mut self, x: usize) {
        match self {
            BoneIndex::Scan => {}
            BoneIndex::Nearby { left, right } => {
                let mut j = x;
                while j < left.len() && (left[j] == NONE || left[j] < x) {
                    left[j] = x;
                    j += 1;
                }
                left[x] = x;

                let mut j = x as isize;
                while j >= 0 && (right[j as usize] == NONE || right[j as usize] > x) {
                    right[j as usize] = x;
                    j -= 1;
                }
                right[x] = x;
            }
            BoneIndex::Distance { dist } => {
                dist[x] = 0;
                for (step, j) in (x + 1..dist.len()).enumerate() {
                    let d = step as u64 + 1;
                    if d >= dist[j] {
                        break;
                    }
                    dist[j] = d;
                }
                for (step, j) in (0..x).rev().enumerate() {
                    let d = step as u64 + 1;
                    if d >= dist[j] {
                        break;
                    }
                    dist[j] = d;
                }
            }
        }
    }

    /// Nearest bone strictly left of `x`.
    pub(crate) fn left_of(&self, bones: &[Option<i64>], x: usize) -> Option<usize> {
        if x == 0 {
            return None;
        }
        match self {
            BoneIndex::Scan => (0..x).rev().find(|&j| bones[j].is_some()),
            BoneIndex::Nearby { left, .. } => Some(left[x - 1]).filter(|&j| j != NONE),
            BoneIndex::Distance { dist } => {
                let mut j = x - 1;
                loop {
                    let d = dist[j];
                    if d == 0 {
                        return Some(j);
                    }
                    // no bone within d - 1 of j
                    if d == u64::MAX || d as usize > j {
                        return None;
                    }
                    j -= d as usize;
                }
            }
        }
    }

    /// Nearest bone strictly right of `x`.
    pub(crate) fn right_of(&self, bones: &[Option<i64>], x: usize) -> Option<usize> {
        let len = bones.len();
        if x + 1 >= len {
            return None;
        }
        match self {
            BoneIndex::Scan => (x + 1..len).find(|&j| bones[j].is_some()),
            BoneIndex::Nearby { right, .. } => Some(right[x + 1]).filter(|&j| j != NONE),
            BoneIndex::Distance { dist } => {
                let mut j = x + 1;
                loop {
                    let d = dist[j];
                    if d == 0 {
                        return Some(j);
                    }
                    if d == u64::MAX {
                        return None;
                    }
                    j = j.checked_add(d as usize).filter(|&n| n < len)?;
                }
            }
        }
    }
}
