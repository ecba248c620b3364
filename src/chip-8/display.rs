use crate::config::EdgePolicy;

pub const FRAME_BUFFER_PIXEL_WIDTH: usize = 64;
pub const FRAME_BUFFER_PIXEL_HEIGHT: usize = 32;
const FRAME_BUFFER_SIZE: usize = FRAME_BUFFER_PIXEL_WIDTH * FRAME_BUFFER_PIXEL_HEIGHT;

/// The 64x32 monochrome screen, stored row-major.
///
/// `dirty` is raised by every clear and draw and stays raised until the
/// renderer calls [`Framebuffer::clear_dirty`].
#[derive(Clone)]
pub struct Framebuffer {
    pixels: [bool; FRAME_BUFFER_SIZE],
    dirty: bool,
}

impl Default for Framebuffer {
    fn default() -> Self {
        Self {
            pixels: [false; FRAME_BUFFER_SIZE],
            dirty: true,
        }
    }
}

impl Framebuffer {
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    pub fn clear_dirty(&mut self) {
        self.dirty = false;
    }

    pub fn pixels(&self) -> &[bool] {
        &self.pixels
    }

    /// Pixel at column `x`, row `y`. Coordinates off the grid read as unset.
    pub fn pixel(&self, x: usize, y: usize) -> bool {
        if x >= FRAME_BUFFER_PIXEL_WIDTH || y >= FRAME_BUFFER_PIXEL_HEIGHT {
            return false;
        }

        self.pixels[y * FRAME_BUFFER_PIXEL_WIDTH + x]
    }

    pub fn rgba_framebuffer(&self) -> Vec<u32> {
        self.pixels
            .iter()
            .map(|&lit| if lit { 0x00_FF_FF_FF } else { 0x00_00_00_00 })
            .collect()
    }

    pub fn cls(&mut self) {
        self.pixels = [false; FRAME_BUFFER_SIZE];
        self.dirty = true;
    }

    /// XOR an 8-pixel wide sprite onto the screen with its top left corner at
    /// (`x`, `y`). Each byte of `sprite` is one row, most significant bit first.
    ///
    /// Returns `true` when any lit pixel was turned off.
    pub fn draw_sprite(&mut self, x: u8, y: u8, sprite: &[u8], edge: EdgePolicy) -> bool {
        self.dirty = true;

        sprite
            .iter()
            .enumerate()
            .fold(false, |did_collide, (y_offset, row)| {
                let inner_collide = (0..8_usize).fold(false, |did_collide_inner, x_bit| {
                    if (row << x_bit) & 0x80 == 0 {
                        return did_collide_inner;
                    }

                    let target = resolve(
                        usize::from(x) + x_bit,
                        usize::from(y) + y_offset,
                        edge,
                    );
                    match target {
                        Some(buffer_index) => {
                            let previous = self.pixels[buffer_index];
                            self.pixels[buffer_index] = !previous;

                            did_collide_inner || previous
                        }
                        None => did_collide_inner,
                    }
                });

                did_collide || inner_collide
            })
    }
}

fn resolve(x: usize, y: usize, edge: EdgePolicy) -> Option<usize> {
    let (x, y) = match edge {
        EdgePolicy::Wrap => (x % FRAME_BUFFER_PIXEL_WIDTH, y % FRAME_BUFFER_PIXEL_HEIGHT),
        EdgePolicy::Clip => {
            if x >= FRAME_BUFFER_PIXEL_WIDTH || y >= FRAME_BUFFER_PIXEL_HEIGHT {
                return None;
            }
            (x, y)
        }
    };

    Some(y * FRAME_BUFFER_PIXEL_WIDTH + x)
}
