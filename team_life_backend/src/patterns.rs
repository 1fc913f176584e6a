//! Built-in stamps. A pattern is a presence mask with no team of its own;
//! the brush team is applied at placement.

use crate::types::{PatternInfo, NO_PATTERN};

// ============================================================================
// MASKS
// ============================================================================

const BLOCK: &[&[u8]] = &[
    &[1, 1],
    &[1, 1],
];

const GLIDER: &[&[u8]] = &[
    &[0, 1, 0],
    &[0, 0, 1],
    &[1, 1, 1],
];

/// Lightweight spaceship
const LWS: &[&[u8]] = &[
    &[0, 1, 1, 1, 1],
    &[1, 0, 0, 0, 1],
    &[0, 0, 0, 0, 1],
    &[1, 0, 0, 1, 0],
];

const LOAF: &[&[u8]] = &[
    &[0, 1, 1, 0],
    &[1, 0, 0, 1],
    &[0, 1, 0, 1],
    &[0, 0, 1, 0],
];

// ============================================================================
// TYPES
// ============================================================================

#[derive(Debug, PartialEq, Eq)]
pub struct Pattern {
    name: &'static str,
    rows: &'static [&'static [u8]],
}

impl Pattern {
    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn width(&self) -> usize {
        self.rows.first().map_or(0, |r| r.len())
    }

    pub fn height(&self) -> usize {
        self.rows.len()
    }

    /// (dx, dy) of every present cell, row by row
    pub fn offsets(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
        self.rows.iter().enumerate().flat_map(|(dy, row)| {
            row.iter()
                .enumerate()
                .filter(|&(_, &present)| present == 1)
                .map(move |(dx, _)| (dx, dy))
        })
    }

    pub fn info(&self) -> PatternInfo {
        PatternInfo {
            name: self.name.to_string(),
            width: self.width() as u8,
            height: self.height() as u8,
            mask: self.rows.iter().map(|r| r.to_vec()).collect(),
        }
    }
}

static PATTERNS: [Pattern; 4] = [
    Pattern { name: "block", rows: BLOCK },
    Pattern { name: "glider", rows: GLIDER },
    Pattern { name: "lws", rows: LWS },
    Pattern { name: "loaf", rows: LOAF },
];

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PatternKind {
    Block,
    Glider,
    Lws,
    Loaf,
}

impl PatternKind {
    pub const ALL: [PatternKind; 4] = [Self::Block, Self::Glider, Self::Lws, Self::Loaf];

    pub fn pattern(self) -> &'static Pattern {
        &PATTERNS[self as usize]
    }

    pub fn name(self) -> &'static str {
        self.pattern().name()
    }

    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "block" => Some(Self::Block),
            "glider" => Some(Self::Glider),
            "lws" | "lwss" => Some(Self::Lws),
            "loaf" => Some(Self::Loaf),
            _ => None,
        }
    }
}

// ============================================================================
// BRUSH SELECTION
// ============================================================================

/// What the brush stamps: a single cell or one of the catalog patterns.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum BrushMode {
    #[default]
    SingleCell,
    Stamp(PatternKind),
}

impl BrushMode {
    /// Parse a brush selection; "none" selects single-cell mode.
    pub fn parse(name: &str) -> Option<Self> {
        if name == NO_PATTERN {
            return Some(Self::SingleCell);
        }
        PatternKind::from_name(name).map(Self::Stamp)
    }

    pub fn name(self) -> &'static str {
        match self {
            Self::SingleCell => NO_PATTERN,
            Self::Stamp(kind) => kind.name(),
        }
    }
}

pub fn lookup(name: &str) -> Option<&'static Pattern> {
    PatternKind::from_name(name).map(PatternKind::pattern)
}

pub fn catalog() -> Vec<PatternInfo> {
    PatternKind::ALL.iter().map(|k| k.pattern().info()).collect()
}
