//! The exhaustive assignment search.

use barricade_protocol::{Role, ROLE_COUNT};

use crate::{AssignError, CostMatrix, PreferenceRanking};

/// The result of an assignment: one role per player, in the same stable
/// player order the rankings were supplied in. Injective by
/// construction — every role comes from a distinct permutation slot.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RoleAssignment {
    roles: Vec<Role>,
}

impl RoleAssignment {
    /// Role given to the player at `player` index, if any.
    pub fn role_for(&self, player: usize) -> Option<Role> {
        self.roles.get(player).copied()
    }

    /// Roles in player order.
    pub fn roles(&self) -> &[Role] {
        &self.roles
    }

    /// Number of players that received a role.
    pub fn len(&self) -> usize {
        self.roles.len()
    }

    /// True when no players were assigned.
    pub fn is_empty(&self) -> bool {
        self.roles.is_empty()
    }
}

/// Computes the role distribution minimizing total dissatisfaction.
///
/// Enumerates every permutation of the eight role slots in
/// lexicographic order and keeps the first one achieving the minimum
/// summed cost (strict improvement only, so ties resolve to the
/// earliest permutation in generation order — a reproducible tie-break,
/// not a meaningful one). Only the first `rankings.len()` rows are
/// scored; the winning permutation is then sliced to the player count,
/// leaving trailing role slots unused when fewer than eight players are
/// seated.
///
/// The identity permutation is enumerated first, so the result never
/// costs more than handing player `i` role `i`.
///
/// # Errors
/// [`AssignError::TooManyPlayers`] when more rankings than roles are
/// supplied. An empty slice yields an empty assignment.
pub fn assign(
    rankings: &[PreferenceRanking],
) -> Result<RoleAssignment, AssignError> {
    if rankings.is_empty() {
        return Ok(RoleAssignment::default());
    }
    if rankings.len() > ROLE_COUNT {
        return Err(AssignError::TooManyPlayers {
            players: rankings.len(),
        });
    }

    let matrix = CostMatrix::from_rankings(rankings);
    tracing::debug!(players = rankings.len(), matrix = %matrix, "scoring cost matrix");

    let mut slots = [0usize; ROLE_COUNT];
    for (i, slot) in slots.iter_mut().enumerate() {
        *slot = i;
    }

    let mut best = slots;
    let mut best_cost = permutation_cost(&matrix, &slots);

    while next_permutation(&mut slots) {
        let cost = permutation_cost(&matrix, &slots);
        if cost < best_cost {
            best_cost = cost;
            best = slots;
        }
    }

    let roles = best[..rankings.len()]
        .iter()
        .map(|&slot| Role::ALL[slot])
        .collect();
    tracing::debug!(total_cost = best_cost, "role assignment selected");

    Ok(RoleAssignment { roles })
}

/// Total cost of one permutation, scoring only the seated players.
fn permutation_cost(
    matrix: &CostMatrix,
    slots: &[usize; ROLE_COUNT],
) -> usize {
    (0..matrix.player_count())
        .map(|player| matrix.cost(player, slots[player]))
        .sum()
}

/// Advances `slots` to its successor in lexicographic order.
/// Returns `false` once the last permutation has been visited.
fn next_permutation(slots: &mut [usize; ROLE_COUNT]) -> bool {
    // Longest non-increasing suffix marks the pivot.
    let mut i = ROLE_COUNT - 1;
    while i > 0 && slots[i - 1] >= slots[i] {
        i -= 1;
    }
    if i == 0 {
        return false;
    }

    // Smallest suffix element greater than the pivot.
    let mut j = ROLE_COUNT - 1;
    while slots[j] <= slots[i - 1] {
        j -= 1;
    }
    slots.swap(i - 1, j);
    slots[i..].reverse();
    true
}
