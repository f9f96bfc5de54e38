//! Node lattice for marching squares
//!
//! Every grid cell contributes one control node at its centre. A control
//! node owns two midpoint nodes, half a tile above (+z) and half a tile to
//! the right (+x). Four neighbouring control nodes bound one marching cell,
//! whose four edge midpoints are borrowed from its bottom-left and
//! bottom-right/top-left corners, so neighbouring cells share them.

use crate::error::{CaveError, Result};
use crate::mesh::cases::Slot;
use crate::mesh::Vec3;
use crate::tile::{Grid, TileCategory};

/// Index into [`MarchingGrid::nodes`].
pub type NodeId = usize;

/// A mesh vertex candidate.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Node {
    pub position: Vec3,
    vertex_index: Option<u32>,
}

impl Node {
    pub fn new(position: Vec3) -> Self {
        Self {
            position,
            vertex_index: None,
        }
    }

    pub fn vertex_index(&self) -> Option<u32> {
        self.vertex_index
    }

    /// Record this node's slot in the vertex buffer. A node is placed in the
    /// buffer once; a second assignment means the dedup bookkeeping broke.
    pub fn assign_index(&mut self, index: u32) -> Result<()> {
        if let Some(existing) = self.vertex_index {
            return Err(CaveError::InvariantViolation(format!(
                "node at {:?} already has vertex {} (tried {})",
                self.position, existing, index
            )));
        }
        self.vertex_index = Some(index);
        Ok(())
    }
}

/// Corner node of a marching cell. Active iff its grid cell is Wall.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ControlNode {
    pub node: NodeId,
    pub active: bool,
    pub above: NodeId,
    pub right: NodeId,
}

/// One marching-squares cell.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct MarchingCell {
    pub x: usize,
    pub y: usize,
    /// Category of the grid cell at the cell's bottom-left corner.
    pub category: TileCategory,
    /// Corner nodes: top-left, top-right, bottom-right, bottom-left.
    pub corners: [NodeId; 4],
    /// Midpoint nodes: top, right, bottom, left.
    pub edges: [NodeId; 4],
    /// 8·TL + 4·TR + 2·BR + 1·BL, one bit per active corner.
    pub code: u8,
}

impl MarchingCell {
    pub fn node(&self, slot: Slot) -> NodeId {
        match slot {
            Slot::TopLeft => self.corners[0],
            Slot::TopRight => self.corners[1],
            Slot::BottomRight => self.corners[2],
            Slot::BottomLeft => self.corners[3],
            Slot::CentreTop => self.edges[0],
            Slot::CentreRight => self.edges[1],
            Slot::CentreBottom => self.edges[2],
            Slot::CentreLeft => self.edges[3],
        }
    }
}

/// Configuration code from corner activity.
pub fn configuration_code(top_left: bool, top_right: bool, bottom_right: bool, bottom_left: bool) -> u8 {
    (top_left as u8) << 3 | (top_right as u8) << 2 | (bottom_right as u8) << 1 | bottom_left as u8
}

/// Control nodes, midpoint nodes and cells for a whole grid.
#[derive(Clone, Debug)]
pub struct MarchingGrid {
    /// Control nodes per row (the grid width).
    pub width: usize,
    /// Control nodes per column (the grid height).
    pub height: usize,
    pub tile_size: f32,
    pub nodes: Vec<Node>,
    pub control: Vec<ControlNode>,
    pub cells: Vec<MarchingCell>,
}

impl MarchingGrid {
    pub fn new(grid: &Grid, tile_size: f32) -> Self {
        let width = grid.width;
        let height = grid.height;
        let map_width = width as f32 * tile_size;
        let map_height = height as f32 * tile_size;
        let half = tile_size / 2.0;

        let mut nodes = Vec::with_capacity(width * height * 3);
        let mut control = Vec::with_capacity(width * height);

        for y in 0..height {
            for x in 0..width {
                let position = Vec3::new(
                    -map_width / 2.0 + x as f32 * tile_size + half,
                    0.0,
                    -map_height / 2.0 + y as f32 * tile_size + half,
                );
                let base = nodes.len();
                nodes.push(Node::new(position));
                nodes.push(Node::new(position.offset(0.0, 0.0, half)));
                nodes.push(Node::new(position.offset(half, 0.0, 0.0)));

                control.push(ControlNode {
                    node: base,
                    active: grid.get(x, y).is_wall(),
                    above: base + 1,
                    right: base + 2,
                });
            }
        }

        let mut cells = Vec::with_capacity(width.saturating_sub(1) * height.saturating_sub(1));
        for y in 0..height.saturating_sub(1) {
            for x in 0..width.saturating_sub(1) {
                let top_left = control[(y + 1) * width + x];
                let top_right = control[(y + 1) * width + x + 1];
                let bottom_right = control[y * width + x + 1];
                let bottom_left = control[y * width + x];

                cells.push(MarchingCell {
                    x,
                    y,
                    category: *grid.get(x, y),
                    corners: [top_left.node, top_right.node, bottom_right.node, bottom_left.node],
                    edges: [top_left.right, bottom_right.above, bottom_left.right, bottom_left.above],
                    code: configuration_code(
                        top_left.active,
                        top_right.active,
                        bottom_right.active,
                        bottom_left.active,
                    ),
                });
            }
        }

        Self {
            width,
            height,
            tile_size,
            nodes,
            control,
            cells,
        }
    }

    pub fn control_at(&self, x: usize, y: usize) -> &ControlNode {
        &self.control[y * self.width + x]
    }

    /// Cells per row.
    pub fn cells_x(&self) -> usize {
        self.width.saturating_sub(1)
    }

    pub fn cell_at(&self, x: usize, y: usize) -> &MarchingCell {
        &self.cells[y * self.cells_x() + x]
    }

    pub fn position(&self, id: NodeId) -> Vec3 {
        self.nodes[id].position
    }
}
