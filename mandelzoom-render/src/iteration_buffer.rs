use mandelzoom_core::EscapeTime;

use crate::tile::Tile;

/// Raw escape-time results for a full frame, row-major.
///
/// Kept separate from pixel colors so a palette change can recolor the
/// frame without re-running the evaluation pass. `max_iterations` records
/// the budget the frame was evaluated with; the coloring pass scales its
/// gradient against it so zoom animation stays continuous.
#[derive(Debug, Clone)]
pub struct IterationBuffer {
    pub width: u32,
    pub height: u32,
    /// Budget the frame was rendered with.
    pub max_iterations: u32,
    /// One result per pixel, row-major order.
    pub data: Vec<EscapeTime>,
}

impl IterationBuffer {
    /// Create a buffer filled with `Bounded` placeholders.
    pub fn new(width: u32, height: u32, max_iterations: u32) -> Self {
        Self {
            width,
            height,
            max_iterations,
            data: vec![EscapeTime::Bounded; width as usize * height as usize],
        }
    }

    /// Copy a tile's results into the correct position in the buffer.
    pub fn blit_tile(&mut self, tile: &Tile, tile_data: &[EscapeTime]) {
        debug_assert_eq!(tile_data.len(), tile.pixel_count());
        let stride = self.width as usize;
        for row in 0..tile.height as usize {
            let src_start = row * tile.width as usize;
            let src_end = src_start + tile.width as usize;
            let dst_start = (tile.y as usize + row) * stride + tile.x as usize;
            let dst_end = dst_start + tile.width as usize;
            self.data[dst_start..dst_end].copy_from_slice(&tile_data[src_start..src_end]);
        }
    }

    /// Result at pixel `(x, y)`.
    #[inline]
    pub fn get(&self, x: u32, y: u32) -> EscapeTime {
        self.data[(y * self.width + x) as usize]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_buffer_is_bounded_everywhere() {
        let buf = IterationBuffer::new(8, 4, 50);
        assert_eq!(buf.data.len(), 32);
        assert!(buf.data.iter().all(|r| matches!(r, EscapeTime::Bounded)));
    }

    #[test]
    fn blit_tile_writes_correct_region() {
        let mut buf = IterationBuffer::new(8, 8, 50);
        let tile = Tile {
            x: 2,
            y: 1,
            width: 3,
            height: 2,
        };
        let escaped = EscapeTime::Escaped {
            iterations: 7,
            norm_sq: 5.0,
        };
        let tile_data = vec![escaped; tile.pixel_count()];
        buf.blit_tile(&tile, &tile_data);

        assert_eq!(buf.get(2, 1), escaped);
        assert_eq!(buf.get(4, 2), escaped);
        assert_eq!(buf.get(0, 0), EscapeTime::Bounded);
        assert_eq!(buf.get(5, 1), EscapeTime::Bounded);
    }
}
