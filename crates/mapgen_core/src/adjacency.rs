//! Directional compatibility rules between patterns.

use crate::library::PatternLibrary;
use crate::pattern::{Pattern, PatternId};
use serde::{Deserialize, Serialize};

/// One of the four grid directions. `y` grows downwards.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    Top,
    Right,
    Bottom,
    Left,
}

impl Direction {
    pub const ALL: [Direction; 4] = [
        Direction::Top,
        Direction::Right,
        Direction::Bottom,
        Direction::Left,
    ];

    #[inline]
    pub fn index(self) -> usize {
        self as usize
    }

    pub fn opposite(self) -> Direction {
        match self {
            Direction::Top => Direction::Bottom,
            Direction::Right => Direction::Left,
            Direction::Bottom => Direction::Top,
            Direction::Left => Direction::Right,
        }
    }

    /// Cell offset `(dx, dy)` of the neighbour in this direction.
    pub fn offset(self) -> (i32, i32) {
        match self {
            Direction::Top => (0, -1),
            Direction::Right => (1, 0),
            Direction::Bottom => (0, 1),
            Direction::Left => (-1, 0),
        }
    }
}

/// How two neighbouring patterns are checked for compatibility.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AdjacencyMode {
    /// The trailing edge row/column of one pattern must equal the leading
    /// edge of its neighbour.
    #[default]
    Border,
    /// The full (N-1)-wide overlap of two windows one cell apart must agree.
    Overlap,
}

/// `rules[direction][pattern]` = sorted ids allowed in that direction.
#[derive(Debug, Clone)]
pub struct AdjacencyRuleSet {
    rules: [Vec<Vec<PatternId>>; 4],
}

impl AdjacencyRuleSet {
    /// Border-matching rules for every ordered pair of library patterns.
    pub fn build(library: &PatternLibrary) -> Self {
        Self::build_with(library, AdjacencyMode::Border)
    }

    /// O(P²·N) pairwise check in every direction.
    ///
    /// A pattern's compatibility with itself is tested like any other pair.
    pub fn build_with(library: &PatternLibrary, mode: AdjacencyMode) -> Self {
        let p = library.len();
        let mut rules: [Vec<Vec<PatternId>>; 4] = Default::default();

        for dir in Direction::ALL {
            let per_pattern = &mut rules[dir.index()];
            per_pattern.reserve(p);
            for (_, from, _) in library.iter() {
                let allowed = library
                    .iter()
                    .filter(|(_, to, _)| compatible(from, to, dir, mode))
                    .map(|(id, _, _)| id)
                    .collect();
                per_pattern.push(allowed);
            }
        }

        let rule_set = Self { rules };
        tracing::debug!(
            patterns = p,
            rules = rule_set.rule_count(),
            ?mode,
            "built adjacency rules"
        );
        rule_set
    }

    /// Build from explicit lists, `rules[direction][pattern]`.
    ///
    /// Lists are sorted and deduplicated. Symmetry is the caller's business.
    pub fn from_lists(rules: [Vec<Vec<PatternId>>; 4]) -> Self {
        let mut rules = rules;
        for per_pattern in rules.iter_mut() {
            for allowed in per_pattern.iter_mut() {
                allowed.sort_unstable();
                allowed.dedup();
            }
        }
        Self { rules }
    }

    /// Ids that may be placed in `dir` from `from`.
    #[inline]
    pub fn allowed(&self, dir: Direction, from: PatternId) -> &[PatternId] {
        &self.rules[dir.index()][from.index()]
    }

    pub fn allows(&self, dir: Direction, from: PatternId, to: PatternId) -> bool {
        self.allowed(dir, from).binary_search(&to).is_ok()
    }

    pub fn pattern_count(&self) -> usize {
        self.rules[0].len()
    }

    /// Total number of (direction, from, to) entries.
    pub fn rule_count(&self) -> usize {
        self.rules
            .iter()
            .flat_map(|per_pattern| per_pattern.iter())
            .map(Vec::len)
            .sum()
    }
}

fn compatible(from: &Pattern, to: &Pattern, dir: Direction, mode: AdjacencyMode) -> bool {
    match mode {
        AdjacencyMode::Border => borders_match(from, to, dir),
        AdjacencyMode::Overlap => {
            let (dx, dy) = dir.offset();
            overlap_agrees(from, to, dx, dy)
        }
    }
}

fn borders_match(from: &Pattern, to: &Pattern, dir: Direction) -> bool {
    let last = from.size() - 1;
    match dir {
        Direction::Right => from.column(last).eq(to.column(0)),
        Direction::Left => from.column(0).eq(to.column(last)),
        Direction::Bottom => from.row(last).eq(to.row(0)),
        Direction::Top => from.row(0).eq(to.row(last)),
    }
}

/// Check that `to`, placed at offset (dx, dy) from `from`, agrees on every
/// tile the two windows share.
fn overlap_agrees(from: &Pattern, to: &Pattern, dx: i32, dy: i32) -> bool {
    let n = from.size() as i32;
    let xmin = dx.max(0);
    let xmax = if dx < 0 { dx + n } else { n };
    let ymin = dy.max(0);
    let ymax = if dy < 0 { dy + n } else { n };

    for y in ymin..ymax {
        for x in xmin..xmax {
            let a = from.get(x as usize, y as usize);
            let b = to.get((x - dx) as usize, (y - dy) as usize);
            if a != b {
                return false;
            }
        }
    }
    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tile::{Grid, Tile};

    fn pattern(n: usize, ids: &[u32]) -> Pattern {
        Pattern::new(n, ids.iter().map(|&i| Tile::floor(i)).collect()).unwrap()
    }

    #[test]
    fn test_direction_opposites() {
        for dir in Direction::ALL {
            assert_eq!(dir.opposite().opposite(), dir);
            let (dx, dy) = dir.offset();
            let (ox, oy) = dir.opposite().offset();
            assert_eq!((dx + ox, dy + oy), (0, 0));
        }
    }

    #[test]
    fn test_borders_match() {
        // a: 1 2    b: 2 3
        //    4 5       5 6
        let a = pattern(2, &[1, 2, 4, 5]);
        let b = pattern(2, &[2, 3, 5, 6]);
        assert!(borders_match(&a, &b, Direction::Right));
        assert!(borders_match(&b, &a, Direction::Left));
        assert!(!borders_match(&a, &b, Direction::Left));
        assert!(!borders_match(&a, &b, Direction::Bottom));
    }

    #[test]
    fn test_vertical_borders() {
        // a: 1 2    b: 3 4
        //    3 4       7 8
        let a = pattern(2, &[1, 2, 3, 4]);
        let b = pattern(2, &[3, 4, 7, 8]);
        assert!(borders_match(&a, &b, Direction::Bottom));
        assert!(borders_match(&b, &a, Direction::Top));
    }

    #[test]
    fn test_overlap_agrees() {
        // 3x3 patterns one cell apart horizontally share two columns
        let a = pattern(3, &[1, 2, 3, 4, 5, 6, 7, 8, 9]);
        let b = pattern(3, &[2, 3, 0, 5, 6, 0, 8, 9, 0]);
        assert!(overlap_agrees(&a, &b, 1, 0));
        assert!(overlap_agrees(&b, &a, -1, 0));
        assert!(!overlap_agrees(&a, &b, 0, 1));
    }

    #[test]
    fn test_self_compatibility_is_derived() {
        // 1 2 / 1 2 : left column != right column, so not compatible with
        // itself horizontally, but top row == bottom row vertically
        let sample = Grid::from_base_ids(2, 2, &[1, 2, 1, 2]).unwrap();
        let library = PatternLibrary::extract(&[sample], 2).unwrap();
        let rules = AdjacencyRuleSet::build(&library);
        let id = PatternId(0);
        assert!(!rules.allows(Direction::Right, id, id));
        assert!(rules.allows(Direction::Bottom, id, id));
    }

    #[test]
    fn test_rules_are_symmetric() {
        let sample =
            Grid::from_base_ids(4, 4, &[1, 2, 1, 3, 2, 2, 3, 1, 1, 3, 3, 2, 2, 1, 1, 1]).unwrap();
        let library = PatternLibrary::extract(&[sample], 2).unwrap();
        for mode in [AdjacencyMode::Border, AdjacencyMode::Overlap] {
            let rules = AdjacencyRuleSet::build_with(&library, mode);
            for dir in Direction::ALL {
                for i in library.ids() {
                    for j in library.ids() {
                        assert_eq!(
                            rules.allows(dir, i, j),
                            rules.allows(dir.opposite(), j, i),
                            "{:?} {} {} {:?}",
                            mode,
                            i,
                            j,
                            dir
                        );
                    }
                }
            }
        }
    }

    #[test]
    fn test_from_lists_sorts() {
        let lists: [Vec<Vec<PatternId>>; 4] = Default::default();
        let mut lists = lists;
        for l in lists.iter_mut() {
            l.push(vec![PatternId(1), PatternId(0), PatternId(1)]);
            l.push(vec![]);
        }
        let rules = AdjacencyRuleSet::from_lists(lists);
        assert_eq!(
            rules.allowed(Direction::Top, PatternId(0)),
            &[PatternId(0), PatternId(1)]
        );
        assert_eq!(rules.pattern_count(), 2);
        assert_eq!(rules.rule_count(), 8);
    }
}
