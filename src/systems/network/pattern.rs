use std::cmp::Ordering;

use crate::components::GridPosition;

/// Pattern name used for texture lookups when a node has no neighbors.
pub const NONE_PATTERN: &str = "None";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GridDirection {
    Left,
    Right,
    Up,
    Down,
}

impl GridDirection {
    /// Output order of pattern codes.
    pub const ORDER: [GridDirection; 4] = [
        GridDirection::Left,
        GridDirection::Right,
        GridDirection::Up,
        GridDirection::Down,
    ];

    pub fn letter(self) -> char {
        match self {
            GridDirection::Left => 'L',
            GridDirection::Right => 'R',
            GridDirection::Up => 'U',
            GridDirection::Down => 'D',
        }
    }

    fn bit(self) -> u8 {
        match self {
            GridDirection::Left => 0b0001,
            GridDirection::Right => 0b0010,
            GridDirection::Up => 0b0100,
            GridDirection::Down => 0b1000,
        }
    }
}

/// The set of neighbor directions present at a node.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct DirectionSet(u8);

impl DirectionSet {
    pub fn insert(&mut self, direction: GridDirection) {
        self.0 |= direction.bit();
    }

    pub fn contains(&self, direction: GridDirection) -> bool {
        self.0 & direction.bit() != 0
    }

    pub fn is_empty(&self) -> bool {
        self.0 == 0
    }

    pub fn len(&self) -> usize {
        self.0.count_ones() as usize
    }

    pub fn iter(&self) -> impl Iterator<Item = GridDirection> + '_ {
        GridDirection::ORDER.into_iter().filter(|d| self.contains(*d))
    }

    /// LRUD-ordered code. An empty set yields `"None"` when
    /// `include_none_sentinel` is set and `""` otherwise.
    pub fn to_pattern_code(&self, include_none_sentinel: bool) -> String {
        if self.is_empty() {
            return if include_none_sentinel {
                NONE_PATTERN.to_string()
            } else {
                String::new()
            };
        }
        self.iter().map(GridDirection::letter).collect()
    }
}

impl FromIterator<GridDirection> for DirectionSet {
    fn from_iter<I: IntoIterator<Item = GridDirection>>(iter: I) -> Self {
        let mut set = DirectionSet::default();
        for direction in iter {
            set.insert(direction);
        }
        set
    }
}

/// Classifies each neighbor by the sign of its offset from `origin`. A
/// diagonal neighbor contributes one horizontal and one vertical direction.
pub fn classify<'a>(origin: GridPosition, neighbors: impl IntoIterator<Item = &'a GridPosition>) -> DirectionSet {
    let mut set = DirectionSet::default();
    for neighbor in neighbors {
        match neighbor.x.cmp(&origin.x) {
            Ordering::Less => set.insert(GridDirection::Left),
            Ordering::Greater => set.insert(GridDirection::Right),
            Ordering::Equal => {}
        }
        match neighbor.y.cmp(&origin.y) {
            Ordering::Less => set.insert(GridDirection::Up),
            Ordering::Greater => set.insert(GridDirection::Down),
            Ordering::Equal => {}
        }
    }
    set
}

/// Texture alias for a conduit at a given pattern, e.g. `gas_pipe_LR`.
pub fn texture_name(base: &str, pattern: DirectionSet) -> String {
    format!("{}_{}", base, pattern.to_pattern_code(true))
}
