use std::fmt;

use nalgebra::Vector2;

/// Qualitative placement of one object relative to another.
///
/// The discriminant is the integer code used in serialized matrices.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[repr(u8)]
pub enum Relation {
    Same = 0,
    Left = 1,
    Right = 2,
    Front = 3,
    Behind = 4,
    Unrelated = 5,
}

impl Relation {
    /// Every relation in tie-breaking priority order.
    pub const ALL: [Relation; 6] = [
        Relation::Same,
        Relation::Left,
        Relation::Right,
        Relation::Front,
        Relation::Behind,
        Relation::Unrelated,
    ];

    pub fn code(self) -> u8 {
        self as u8
    }

    pub fn from_code(code: u8) -> Option<Self> {
        Self::ALL.get(code as usize).copied()
    }

    /// Canonical 2-D direction this relation votes for.
    pub fn prototype(self) -> Vector2<f64> {
        match self {
            Relation::Same => Vector2::new(1.0, 1.0),
            Relation::Left => Vector2::new(1.0, 0.0),
            Relation::Right => Vector2::new(-1.0, 0.0),
            Relation::Front => Vector2::new(0.0, 1.0),
            Relation::Behind => Vector2::new(0.0, -1.0),
            Relation::Unrelated => Vector2::new(0.0, 0.0),
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Relation::Same => "same",
            Relation::Left => "left",
            Relation::Right => "right",
            Relation::Front => "front",
            Relation::Behind => "behind",
            Relation::Unrelated => "unrelated",
        }
    }

    /// Relation whose prototype lies closest, in summed Euclidean distance, to
    /// the observed relations tallied in `votes` (indexed by code).
    ///
    /// Ties resolve to the earlier entry of [`Relation::ALL`]; an empty tally
    /// yields [`Relation::Unrelated`].
    pub fn vote(votes: &[usize; 6]) -> Relation {
        if votes.iter().all(|v| *v == 0) {
            return Relation::Unrelated;
        }

        let mut best = Relation::Same;
        let mut best_cost = f64::INFINITY;
        for candidate in Self::ALL {
            let p = candidate.prototype();
            let cost: f64 = Self::ALL
                .iter()
                .zip(votes)
                .map(|(observed, &n)| n as f64 * (p - observed.prototype()).norm())
                .sum();
            if cost < best_cost {
                best = candidate;
                best_cost = cost;
            }
        }
        best
    }
}

impl fmt::Display for Relation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
