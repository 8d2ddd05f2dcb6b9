//! Color-coded hit testing.
//!
//! Every base vertex is drawn in an off-screen pass with its index encoded as
//! an 8-bit intensity in the red channel, on top of a white background. Reading
//! back the pixel under the cursor and decoding its red byte tells which vertex
//! (if any) was hit.

use std::fmt;

/// Red byte of the white clear color: nothing was hit.
pub const BACKGROUND_ID: u8 = 255;

/// Picking color of base vertex `index`. Only the red channel carries the id.
pub fn encode_id(index: u8) -> [f32; 4] {
    [index as f32 / 255.0, 0.0, 0.0, 1.0]
}

/// Picking colors for a polygon with `count` vertices, in vertex order.
pub fn id_colors(count: usize) -> Vec<[f32; 4]> {
    debug_assert!(count <= BACKGROUND_ID as usize);
    (0..count).map(|i| encode_id(i as u8)).collect()
}

/// Result of decoding one read-back pixel.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum PickResult {
    Background,
    /// Raw id that was read back. It only refers to a vertex if it is smaller than the vertex count.
    Point(u8),
}

impl PickResult {
    /// Decodes the red byte of a read-back RGBA8 pixel.
    pub fn decode(red: u8) -> PickResult {
        if red == BACKGROUND_ID {
            PickResult::Background
        } else {
            PickResult::Point(red)
        }
    }

    pub fn from_pixel(pixel: [u8; 4]) -> PickResult {
        PickResult::decode(pixel[0])
    }

    /// Index of the picked vertex, if the id names one of `vertex_count` vertices.
    pub fn vertex_index(self, vertex_count: usize) -> Option<usize> {
        match self {
            PickResult::Point(id) if (id as usize) < vertex_count => Some(id as usize),
            _ => None,
        }
    }
}

impl fmt::Display for PickResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PickResult::Background => write!(f, "background"),
            PickResult::Point(id) => write!(f, "point {}", id),
        }
    }
}
