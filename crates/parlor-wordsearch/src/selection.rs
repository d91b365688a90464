use parlor_core::{Delta, Position};

/// An in-progress drag selection, kept normalized at all times.
///
/// The first point is the anchor. On every extension the whole path is
/// recomputed from the anchor toward the reported point, so the path is
/// always a straight, contiguous, unit-step run in one of the eight
/// compass directions. Paths are transient: created on selection start,
/// rebuilt on every continue event, consumed on selection end.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectionPath {
    points: Vec<Position>,
}

impl SelectionPath {
    /// Starts a new path anchored at `anchor`.
    #[must_use]
    pub fn begin(anchor: Position) -> Self {
        Self {
            points: vec![anchor],
        }
    }

    /// The fixed first point direction is re-derived from.
    #[must_use]
    pub fn anchor(&self) -> Position {
        self.points[0]
    }

    /// The normalized run, anchor first.
    #[must_use]
    pub fn points(&self) -> &[Position] {
        &self.points
    }

    /// Extends the selection toward `target` on a grid of side `size`.
    ///
    /// The direction is the sign of the anchor-to-target difference per
    /// axis. The path is rebuilt from the anchor stepping that direction
    /// until the target is reached or the grid edge truncates the run. A
    /// target that is not on a straight line from the anchor (and inside
    /// the grid) is drag jitter crossing rows; it leaves the path as it
    /// was rather than producing a kinked or runaway run. A repeat of the
    /// path's last point is ignored.
    pub fn extend_to(&mut self, target: Position, size: usize) {
        if self.points.last() == Some(&target) {
            return;
        }
        let anchor = self.anchor();
        if target == anchor {
            self.points.truncate(1);
            return;
        }

        let delta = anchor.direction_to(target);
        let in_bounds = target.row < size && target.col < size;
        if in_bounds && !Self::is_aligned(anchor, target) {
            return;
        }

        self.points = Self::walk(anchor, target, delta, size);
    }

    fn is_aligned(anchor: Position, target: Position) -> bool {
        let drow = anchor.row.abs_diff(target.row);
        let dcol = anchor.col.abs_diff(target.col);
        drow == 0 || dcol == 0 || drow == dcol
    }

    /// Steps from `anchor` toward `target`, truncating at the grid edge.
    fn walk(anchor: Position, target: Position, delta: Delta, size: usize) -> Vec<Position> {
        let mut points = vec![anchor];
        let mut current = anchor;
        while current != target {
            let Some(next) = current.step(delta) else {
                break;
            };
            if next.row >= size || next.col >= size {
                break;
            }
            points.push(next);
            current = next;
        }
        points
    }
}

#[cfg(test)]
mod tests {
    use parlor_core::Position;
    use proptest::prelude::*;

    use super::SelectionPath;

    const SIZE: usize = 12;

    fn path_of(points: &[(usize, usize)]) -> Vec<Position> {
        points
            .iter()
            .map(|&(row, col)| Position::new(row, col))
            .collect()
    }

    #[test]
    fn horizontal_extension_builds_the_full_run() {
        let mut path = SelectionPath::begin(Position::new(0, 0));
        path.extend_to(Position::new(0, 4), SIZE);
        assert_eq!(
            path.points(),
            path_of(&[(0, 0), (0, 1), (0, 2), (0, 3), (0, 4)])
        );
    }

    #[test]
    fn direction_change_keeps_the_prior_straight_run() {
        let mut path = SelectionPath::begin(Position::new(0, 0));
        path.extend_to(Position::new(0, 4), SIZE);
        // (2, 4) is not on a straight line from the anchor.
        path.extend_to(Position::new(2, 4), SIZE);
        assert_eq!(
            path.points(),
            path_of(&[(0, 0), (0, 1), (0, 2), (0, 3), (0, 4)])
        );
    }

    #[test]
    fn reversing_over_the_anchor_rebuilds_the_other_way() {
        let mut path = SelectionPath::begin(Position::new(4, 4));
        path.extend_to(Position::new(4, 7), SIZE);
        path.extend_to(Position::new(4, 2), SIZE);
        assert_eq!(path.points(), path_of(&[(4, 4), (4, 3), (4, 2)]));
    }

    #[test]
    fn shrinking_toward_the_anchor_shortens_the_run() {
        let mut path = SelectionPath::begin(Position::new(3, 3));
        path.extend_to(Position::new(7, 7), SIZE);
        path.extend_to(Position::new(5, 5), SIZE);
        assert_eq!(path.points(), path_of(&[(3, 3), (4, 4), (5, 5)]));
        path.extend_to(Position::new(3, 3), SIZE);
        assert_eq!(path.points(), path_of(&[(3, 3)]));
    }

    #[test]
    fn consecutive_duplicate_reports_are_ignored() {
        let mut path = SelectionPath::begin(Position::new(1, 1));
        path.extend_to(Position::new(1, 3), SIZE);
        let before = path.clone();
        path.extend_to(Position::new(1, 3), SIZE);
        assert_eq!(path, before);
    }

    #[test]
    fn out_of_bounds_target_truncates_at_the_edge() {
        let mut path = SelectionPath::begin(Position::new(0, 9));
        path.extend_to(Position::new(0, 14), SIZE);
        assert_eq!(path.points(), path_of(&[(0, 9), (0, 10), (0, 11)]));
    }

    proptest! {
        #[test]
        fn normalized_paths_are_straight_contiguous_and_anchored(
            (ar, ac) in (0usize..SIZE, 0usize..SIZE),
            targets in proptest::collection::vec((0usize..SIZE + 4, 0usize..SIZE + 4), 1..12),
        ) {
            let anchor = Position::new(ar, ac);
            let mut path = SelectionPath::begin(anchor);
            for (row, col) in targets {
                path.extend_to(Position::new(row, col), SIZE);

                let points = path.points();
                prop_assert_eq!(points[0], anchor);
                prop_assert!(points.iter().all(|p| p.row < SIZE && p.col < SIZE));
                if points.len() >= 2 {
                    let delta = points[0].direction_to(points[1]);
                    for pair in points.windows(2) {
                        prop_assert_eq!(pair[0].step(delta), Some(pair[1]));
                    }
                }
            }
        }
    }
}
