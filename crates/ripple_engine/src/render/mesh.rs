//! Grid mesh generation
//!
//! Builds the flat lattice that the ripple vertex shader deforms. The grid
//! lies in the XZ plane, centred on the origin, with `y = 0` everywhere; all
//! displacement happens on the GPU.
//!
//! Each quad cell is split into two triangles. The diagonal alternates in a
//! checkerboard pattern so the triangulation has no directional bias:
//!
//! ```text
//!  i2 ---- i3      i2 ---- i3
//!   | \     |       |     / |
//!   |   \   |       |   /   |
//!   |     \ |       | /     |
//!  i0 ---- i1      i0 ---- i1
//!   even cell       odd cell
//! ```

use bytemuck::{Pod, Zeroable};
use thiserror::Error;

use crate::foundation::math::utils::normalize_index;

/// Mesh construction errors
#[derive(Error, Debug, Clone, PartialEq)]
pub enum MeshError {
    /// A grid needs at least one quad in each direction
    #[error("grid needs at least one quad per axis, got {quads_x}x{quads_z}")]
    EmptyGrid {
        /// Requested quads along X
        quads_x: u32,
        /// Requested quads along Z
        quads_z: u32,
    },

    /// Extent must be finite and positive
    #[error("grid size must be finite and positive, got {size_x}x{size_z}")]
    InvalidSize {
        /// Requested extent along X
        size_x: f32,
        /// Requested extent along Z
        size_z: f32,
    },

    /// Vertex indices would not fit the 32-bit index buffer
    #[error("grid of {quads_x}x{quads_z} quads exceeds the 32-bit index range")]
    TooLarge {
        /// Requested quads along X
        quads_x: u32,
        /// Requested quads along Z
        quads_z: u32,
    },
}

/// Result type for mesh operations
pub type MeshResult<T> = Result<T, MeshError>;

/// Grid resolution and extent
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GridSpec {
    /// Quads along X
    pub quads_x: u32,
    /// Quads along Z
    pub quads_z: u32,
    /// World-space extent along X
    pub size_x: f32,
    /// World-space extent along Z
    pub size_z: f32,
}

impl GridSpec {
    /// Check the parameters describe a buildable grid
    pub fn validate(&self) -> MeshResult<()> {
        if self.quads_x == 0 || self.quads_z == 0 {
            return Err(MeshError::EmptyGrid { quads_x: self.quads_x, quads_z: self.quads_z });
        }
        let valid_extent = |size: f32| size.is_finite() && size > 0.0;
        if !valid_extent(self.size_x) || !valid_extent(self.size_z) {
            return Err(MeshError::InvalidSize { size_x: self.size_x, size_z: self.size_z });
        }
        let vertex_count = (u64::from(self.quads_x) + 1) * (u64::from(self.quads_z) + 1);
        let index_count = u64::from(self.quads_x) * u64::from(self.quads_z) * 6;
        if vertex_count > u64::from(u32::MAX) || usize::try_from(index_count).is_err() {
            return Err(MeshError::TooLarge { quads_x: self.quads_x, quads_z: self.quads_z });
        }
        Ok(())
    }

    /// Vertices per row of the lattice
    pub fn row_stride(&self) -> u32 {
        self.quads_x + 1
    }

    /// Number of lattice points
    pub fn vertex_count(&self) -> usize {
        (self.quads_x as usize + 1) * (self.quads_z as usize + 1)
    }

    /// Number of triangle-list indices
    pub fn index_count(&self) -> usize {
        self.quads_x as usize * self.quads_z as usize * 6
    }
}

/// A single grid vertex, laid out for direct upload
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Pod, Zeroable)]
pub struct GridVertex {
    /// Object-space position
    pub position: [f32; 3],
}

/// Which diagonal a cell is split along
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DiagonalSplit {
    /// Diagonal from the lower-left to the upper-right corner (even cells)
    LowerLeftToUpperRight,
    /// Diagonal from the lower-right to the upper-left corner (odd cells)
    LowerRightToUpperLeft,
}

impl DiagonalSplit {
    /// Split orientation for the cell at `row`, `column`
    pub fn for_cell(row: u32, column: u32) -> Self {
        if (row + column) % 2 == 0 {
            Self::LowerLeftToUpperRight
        } else {
            Self::LowerRightToUpperLeft
        }
    }

    /// The two triangles of a cell given its corners in `[i0, i1, i2, i3]` order
    pub fn triangles(self, [i0, i1, i2, i3]: [u32; 4]) -> [u32; 6] {
        match self {
            Self::LowerLeftToUpperRight => [i0, i2, i3, i0, i3, i1],
            Self::LowerRightToUpperLeft => [i0, i2, i1, i1, i2, i3],
        }
    }
}

/// Immutable grid geometry: lattice positions plus a triangle list
#[derive(Debug, Clone, PartialEq)]
pub struct GridMesh {
    spec: GridSpec,
    vertices: Vec<GridVertex>,
    indices: Vec<u32>,
}

impl GridMesh {
    /// Row-major lattice positions
    pub fn vertices(&self) -> &[GridVertex] {
        &self.vertices
    }

    /// Triangle-list indices into [`Self::vertices`]
    pub fn indices(&self) -> &[u32] {
        &self.indices
    }

    /// Corner indices `[i0, i1, i2, i3]` of the cell at `row`, `column`
    pub fn cell_corners(&self, row: u32, column: u32) -> [u32; 4] {
        cell_corners(self.spec.row_stride(), row, column)
    }

    /// The six indices emitted for the cell at `row`, `column`
    ///
    /// `None` when the cell lies outside the grid.
    pub fn cell_indices(&self, row: u32, column: u32) -> Option<&[u32]> {
        if row >= self.spec.quads_z || column >= self.spec.quads_x {
            return None;
        }
        let start = (row as usize * self.spec.quads_x as usize + column as usize) * 6;
        self.indices.get(start..start + 6)
    }

    /// Consume the mesh, returning its vertex and index storage
    pub fn into_parts(self) -> (Vec<GridVertex>, Vec<u32>) {
        (self.vertices, self.indices)
    }
}

fn cell_corners(row_stride: u32, row: u32, column: u32) -> [u32; 4] {
    let i0 = row * row_stride + column;
    let i2 = i0 + row_stride;
    [i0, i0 + 1, i2, i2 + 1]
}

/// Build a regular grid centred on the origin
///
/// Produces `(quads_x + 1) * (quads_z + 1)` vertices spanning
/// `[-size_x / 2, size_x / 2]` by `[-size_z / 2, size_z / 2]`, and
/// `quads_x * quads_z * 6` indices.
pub fn build_grid(spec: GridSpec) -> MeshResult<GridMesh> {
    spec.validate()?;

    let half_x = spec.size_x / 2.0;
    let half_z = spec.size_z / 2.0;

    let mut vertices = Vec::with_capacity(spec.vertex_count());
    for j in 0..=spec.quads_z {
        let z = normalize_index(j, spec.quads_z) * half_z;
        for i in 0..=spec.quads_x {
            let x = normalize_index(i, spec.quads_x) * half_x;
            vertices.push(GridVertex { position: [x, 0.0, z] });
        }
    }

    let mut indices = Vec::with_capacity(spec.index_count());
    for row in 0..spec.quads_z {
        for column in 0..spec.quads_x {
            let corners = cell_corners(spec.row_stride(), row, column);
            indices.extend_from_slice(&DiagonalSplit::for_cell(row, column).triangles(corners));
        }
    }

    log::debug!(
        "Built {}x{} grid: {} vertices, {} indices",
        spec.quads_x,
        spec.quads_z,
        vertices.len(),
        indices.len()
    );

    Ok(GridMesh { spec, vertices, indices })
}
