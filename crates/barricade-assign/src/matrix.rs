//! Preference rankings and the cost matrix built from them.

use std::fmt;

use barricade_protocol::{Role, ROLE_COUNT};

/// One player's ordering of roles, most preferred first.
///
/// At most [`ROLE_COUNT`] entries, no duplicates. The game layer
/// validates rankings as players submit them; this type is a thin
/// wrapper so the engine's signatures stay honest about what the
/// numbers mean.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PreferenceRanking(Vec<Role>);

impl PreferenceRanking {
    /// Wraps an already-validated ranking.
    pub fn new(roles: Vec<Role>) -> Self {
        Self(roles)
    }

    /// Roles in preference order.
    pub fn roles(&self) -> &[Role] {
        &self.0
    }

    /// True when the player never submitted a ranking.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl From<Vec<Role>> for PreferenceRanking {
    fn from(roles: Vec<Role>) -> Self {
        Self::new(roles)
    }
}

/// The optimization objective: rows are players in stable seating
/// order, columns are the canonical role order, and each cell is the
/// rank position that role holds in the player's ranking (0 = top
/// pick).
///
/// A role absent from a player's ranking keeps the default cell value
/// of 0 — it scores exactly like a top pick. That biases partial
/// rankings toward handing out unranked roles for free.
/// TODO: confirm with the game designers whether unranked roles should
/// carry a high penalty instead; keeping 0 until that is settled.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CostMatrix {
    rows: Vec<[usize; ROLE_COUNT]>,
}

impl CostMatrix {
    /// Builds the matrix from rankings in stable player order.
    ///
    /// A duplicated role in a ranking keeps its last rank position.
    pub fn from_rankings(rankings: &[PreferenceRanking]) -> Self {
        let rows = rankings
            .iter()
            .map(|ranking| {
                let mut row = [0usize; ROLE_COUNT];
                for (rank, role) in ranking.roles().iter().enumerate() {
                    row[role.index()] = rank;
                }
                row
            })
            .collect();
        Self { rows }
    }

    /// Number of players (rows).
    pub fn player_count(&self) -> usize {
        self.rows.len()
    }

    /// Cost of handing `player` the role in canonical slot `role_slot`.
    pub fn cost(&self, player: usize, role_slot: usize) -> usize {
        self.rows[player][role_slot]
    }

    /// Summed cost of a concrete player → role mapping.
    pub fn total_cost(&self, roles: &[Role]) -> usize {
        roles
            .iter()
            .enumerate()
            .map(|(player, role)| self.cost(player, role.index()))
            .sum()
    }
}

impl fmt::Display for CostMatrix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "   ")?;
        for col in 0..ROLE_COUNT {
            write!(f, "{col} ")?;
        }
        for (player, row) in self.rows.iter().enumerate() {
            write!(f, "\n{player} [")?;
            for (col, cost) in row.iter().enumerate() {
                write!(f, "{cost}")?;
                if col != ROLE_COUNT - 1 {
                    write!(f, ",")?;
                }
            }
            write!(f, "]")?;
        }
        writeln!(f)
    }
}
