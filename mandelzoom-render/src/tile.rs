/// Default tile size in pixels. 64×64 results fit comfortably in L1 and
/// give the scheduler enough grain to balance uneven tiles.
pub const TILE_SIZE: u32 = 64;

/// A rectangular tile within the render surface.
///
/// The unit of parallel work and of cancellation granularity: a render
/// aborts between tiles, never mid-tile.
#[derive(Debug, Clone, Copy)]
pub struct Tile {
    /// Pixel x of the top-left corner.
    pub x: u32,
    /// Pixel y of the top-left corner.
    pub y: u32,
    /// Tile width in pixels (may be smaller at the right edge).
    pub width: u32,
    /// Tile height in pixels (may be smaller at the bottom edge).
    pub height: u32,
}

impl Tile {
    /// Number of pixels in this tile.
    pub fn pixel_count(&self) -> usize {
        self.width as usize * self.height as usize
    }
}

/// Build a grid of tiles covering a `width × height` surface.
pub fn build_tile_grid(width: u32, height: u32) -> Vec<Tile> {
    let mut tiles = Vec::new();
    let mut y = 0;
    while y < height {
        let th = TILE_SIZE.min(height - y);
        let mut x = 0;
        while x < width {
            let tw = TILE_SIZE.min(width - x);
            tiles.push(Tile {
                x,
                y,
                width: tw,
                height: th,
            });
            x += tw;
        }
        y += th;
    }
    tiles
}
