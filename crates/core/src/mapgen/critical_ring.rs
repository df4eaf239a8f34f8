//! Critical-ring analysis (§4.9): reachable, non-frontier tiles that
//! touch the frontier — the best candidates for a new platform.

use std::collections::HashSet;

use crate::types::Pos;

pub fn compute(reachable: &[Pos], frontier: &[Pos]) -> Vec<Pos> {
    let frontier_set: HashSet<Pos> = frontier.iter().copied().collect();
    reachable
        .iter()
        .copied()
        .filter(|pos| !frontier_set.contains(pos))
        .filter(|&pos| {
            [(1, 0), (-1, 0), (0, 1), (0, -1)]
                .iter()
                .any(|&(dx, dy)| frontier_set.contains(&pos.offset(dx, dy)))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tile_adjacent_to_frontier_is_in_critical_ring() {
        let reachable = vec![Pos::new(1, 1), Pos::new(2, 1)];
        let frontier = vec![Pos::new(2, 1)];
        let ring = compute(&reachable, &frontier);
        assert_eq!(ring, vec![Pos::new(1, 1)]);
    }

    #[test]
    fn frontier_tiles_are_excluded_from_their_own_ring() {
        let reachable = vec![Pos::new(2, 1)];
        let frontier = vec![Pos::new(2, 1)];
        assert!(compute(&reachable, &frontier).is_empty());
    }
}
