//! Marching-squares configuration table
//!
//! Maps each 4-bit configuration code to the ordered node slots whose
//! polygon covers the Wall part of the cell. Polygons are convex and wound
//! consistently, so a fan from the first slot triangulates them.

/// A node position within one marching cell.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Slot {
    TopLeft,
    TopRight,
    BottomRight,
    BottomLeft,
    CentreTop,
    CentreRight,
    CentreBottom,
    CentreLeft,
}

use Slot::*;

/// Polygon slots per configuration code (8·TL + 4·TR + 2·BR + 1·BL).
pub const CASES: [&[Slot]; 16] = [
    /* 0 */ &[],
    /* 1 */ &[CentreLeft, CentreBottom, BottomLeft],
    /* 2 */ &[BottomRight, CentreBottom, CentreRight],
    /* 3 */ &[CentreRight, BottomRight, BottomLeft, CentreLeft],
    /* 4 */ &[TopRight, CentreRight, CentreTop],
    /* 5 */ &[CentreTop, TopRight, CentreRight, CentreBottom, BottomLeft, CentreLeft],
    /* 6 */ &[CentreTop, TopRight, BottomRight, CentreBottom],
    /* 7 */ &[CentreTop, TopRight, BottomRight, BottomLeft, CentreLeft],
    /* 8 */ &[TopLeft, CentreTop, CentreLeft],
    /* 9 */ &[TopLeft, CentreTop, CentreBottom, BottomLeft],
    /* 10 */ &[TopLeft, CentreTop, CentreRight, BottomRight, CentreBottom, CentreLeft],
    /* 11 */ &[TopLeft, CentreTop, CentreRight, BottomRight, BottomLeft],
    /* 12 */ &[TopLeft, TopRight, CentreRight, CentreLeft],
    /* 13 */ &[TopLeft, TopRight, CentreRight, CentreBottom, BottomLeft],
    /* 14 */ &[TopLeft, TopRight, BottomRight, CentreBottom, CentreLeft],
    /* 15 */ &[TopLeft, TopRight, BottomRight, BottomLeft],
];

/// Slots for a configuration code.
pub fn polygon(code: u8) -> &'static [Slot] {
    CASES[(code & 0x0f) as usize]
}

/// Number of fan triangles for a polygon with `points` vertices.
pub fn fan_triangle_count(points: usize) -> usize {
    points.saturating_sub(2)
}

/// Whether a slot is a corner (control) node rather than an edge midpoint.
pub fn is_corner(slot: Slot) -> bool {
    matches!(slot, TopLeft | TopRight | BottomRight | BottomLeft)
}
