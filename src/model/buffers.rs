//! Growable flat buffers holding mesh geometry
//!
//! Vertex positions and triangle indices are stored as flat arrays of
//! fixed-arity tuples so they can be handed to a scene without conversion.

use crate::error::Result;
use crate::xml::Attributes;

/// Number of tuples a buffer can hold before its first growth
pub const INITIAL_TUPLE_CAPACITY: usize = 1000;

/// A flat array of `N`-tuples that doubles its capacity when full
///
/// Storage is allocated on the first append. Capacity is tracked in whole
/// tuples and is always `INITIAL_TUPLE_CAPACITY * 2^k`.
#[derive(Debug, Clone, PartialEq)]
pub struct TupleBuffer<T, const N: usize> {
    data: Vec<T>,
    capacity: usize,
}

impl<T: Copy, const N: usize> TupleBuffer<T, N> {
    /// Create an empty buffer
    pub fn new() -> Self {
        Self {
            data: Vec::new(),
            capacity: INITIAL_TUPLE_CAPACITY,
        }
    }

    /// Store one tuple at the next free slot, doubling the capacity if needed
    pub fn append(&mut self, tuple: [T; N]) {
        if self.data.len() + N > self.capacity * N {
            self.capacity *= 2;
        }
        if self.data.capacity() < self.capacity * N {
            self.data.reserve_exact(self.capacity * N - self.data.len());
        }
        self.data.extend_from_slice(&tuple);
    }

    /// Number of whole tuples stored
    pub fn count(&self) -> usize {
        self.data.len() / N
    }

    /// Check if no tuple has been stored
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Capacity in tuples
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// The used slots, `count() * N` values in append order
    pub fn as_slice(&self) -> &[T] {
        &self.data
    }

    /// Get the tuple at `index`
    pub fn get(&self, index: usize) -> Option<[T; N]> {
        let start = index.checked_mul(N)?;
        let end = start.checked_add(N)?;
        let chunk = self.data.get(start..end)?;
        Some(std::array::from_fn(|i| chunk[i]))
    }

    /// Iterate over the stored tuples
    pub fn iter(&self) -> impl Iterator<Item = [T; N]> + '_ {
        self.data
            .chunks_exact(N)
            .map(|chunk| std::array::from_fn(|i| chunk[i]))
    }
}

impl<T: Copy, const N: usize> Default for TupleBuffer<T, N> {
    fn default() -> Self {
        Self::new()
    }
}

/// Vertex positions of a mesh, one `(x, y, z)` tuple per vertex
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Vertices {
    coords: TupleBuffer<f32, 3>,
}

impl Vertices {
    /// Create an empty vertex list
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a vertex
    pub fn append(&mut self, x: f32, y: f32, z: f32) {
        self.coords.append([x, y, z]);
    }

    /// Append a vertex from the `x`, `y` and `z` attributes of a `<vertex>` row
    pub fn add_vertex(&mut self, attrs: &Attributes) -> Result<()> {
        let x = attrs.parse_coordinate("vertex", "x")?;
        let y = attrs.parse_coordinate("vertex", "y")?;
        let z = attrs.parse_coordinate("vertex", "z")?;
        self.append(x, y, z);
        Ok(())
    }

    /// Number of vertices
    pub fn count(&self) -> usize {
        self.coords.count()
    }

    /// Flat coordinate array, exactly `count() * 3` values
    pub fn coordinates(&self) -> &[f32] {
        self.coords.as_slice()
    }

    /// Get a vertex by index
    pub fn get(&self, index: usize) -> Option<[f32; 3]> {
        self.coords.get(index)
    }

    /// Capacity in vertices
    pub fn capacity(&self) -> usize {
        self.coords.capacity()
    }
}

/// Triangles of a mesh, one `(v1, v2, v3)` tuple of zero-based vertex indices each
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Triangles {
    indices: TupleBuffer<u32, 3>,
}

impl Triangles {
    /// Create an empty triangle list
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a triangle
    pub fn append(&mut self, v1: u32, v2: u32, v3: u32) {
        self.indices.append([v1, v2, v3]);
    }

    /// Append a triangle from the `v1`, `v2` and `v3` attributes of a `<triangle>` row
    pub fn add_triangle(&mut self, attrs: &Attributes) -> Result<()> {
        let v1 = attrs.parse_index("triangle", "v1")?;
        let v2 = attrs.parse_index("triangle", "v2")?;
        let v3 = attrs.parse_index("triangle", "v3")?;
        self.append(v1, v2, v3);
        Ok(())
    }

    /// Number of triangles
    pub fn count(&self) -> usize {
        self.indices.count()
    }

    /// Flat index array, exactly `count() * 3` values
    pub fn indices(&self) -> &[u32] {
        self.indices.as_slice()
    }

    /// Get a triangle by index
    pub fn get(&self, index: usize) -> Option<[u32; 3]> {
        self.indices.get(index)
    }

    /// Capacity in triangles
    pub fn capacity(&self) -> usize {
        self.indices.capacity()
    }
}
