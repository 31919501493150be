/// Base of the Unicode Braille Patterns block (U+2800, no dots raised)
pub const BRAILLE_BLANK: char = '\u{2800}';

/// Color claim on a character cell. When two tints land in the same cell the
/// higher `rank` keeps it, so severe markers stay visible under mild ones.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Tint {
    pub rank: u8,
    pub rgb: [u8; 3],
}

/// Braille canvas for terminal graphics.
/// Each character cell is a 2x4 dot grid, so a `width` x `height` canvas
/// has `width*2` x `height*4` addressable pixels.
pub struct BrailleCanvas {
    width: usize,
    height: usize,
    dots: Vec<u8>,
    tints: Vec<Option<Tint>>,
}

impl BrailleCanvas {
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            dots: vec![0; width * height],
            tints: vec![None; width * height],
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn pixel_width(&self) -> usize {
        self.width * 2
    }

    pub fn pixel_height(&self) -> usize {
        self.height * 4
    }

    /// Dot layout per character:
    /// ```text
    /// (0,0) (1,0)   bits: 0x01 0x08
    /// (0,1) (1,1)   bits: 0x02 0x10
    /// (0,2) (1,2)   bits: 0x04 0x20
    /// (0,3) (1,3)   bits: 0x40 0x80
    /// ```
    #[inline(always)]
    fn dot_bit(x: usize, y: usize) -> u8 {
        const BITS: [[u8; 4]; 2] = [[0x01, 0x02, 0x04, 0x40], [0x08, 0x10, 0x20, 0x80]];
        BITS[x % 2][y % 4]
    }

    /// Cell index for a pixel, `None` off canvas
    #[inline(always)]
    fn cell_index(&self, x: i32, y: i32) -> Option<usize> {
        if x < 0 || y < 0 {
            return None;
        }
        let (cx, cy) = (x as usize / 2, y as usize / 4);
        (cx < self.width && cy < self.height).then(|| cy * self.width + cx)
    }

    pub fn set_pixel(&mut self, x: i32, y: i32) {
        if let Some(idx) = self.cell_index(x, y) {
            self.dots[idx] |= Self::dot_bit(x as usize, y as usize);
        }
    }

    /// Raise a dot and claim its cell's color unless a higher rank holds it
    pub fn set_tinted(&mut self, x: i32, y: i32, tint: Tint) {
        let Some(idx) = self.cell_index(x, y) else {
            return;
        };
        self.dots[idx] |= Self::dot_bit(x as usize, y as usize);
        match self.tints[idx] {
            Some(held) if held.rank > tint.rank => {}
            _ => self.tints[idx] = Some(tint),
        }
    }

    /// Glyph and tint of the character at (`col`, `row`)
    pub fn cell(&self, col: usize, row: usize) -> Option<(char, Option<Tint>)> {
        if col >= self.width || row >= self.height {
            return None;
        }
        let idx = row * self.width + col;
        let ch = char::from_u32(BRAILLE_BLANK as u32 + self.dots[idx] as u32).unwrap_or(' ');
        Some((ch, self.tints[idx]))
    }

    pub fn is_blank(&self) -> bool {
        self.dots.iter().all(|&d| d == 0)
    }

    #[cfg(test)]
    pub(crate) fn row_to_string(&self, row: usize) -> String {
        (0..self.width)
            .filter_map(|col| self.cell(col, row).map(|(ch, _)| ch))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const RED: Tint = Tint { rank: 3, rgb: [255, 0, 0] };
    const GREY: Tint = Tint { rank: 0, rgb: [128, 128, 128] };

    #[test]
    fn test_single_pixel() {
        let mut canvas = BrailleCanvas::new(1, 1);
        canvas.set_pixel(0, 0);
        assert_eq!(canvas.row_to_string(0), "⠁");
    }

    #[test]
    fn test_all_dots() {
        let mut canvas = BrailleCanvas::new(1, 1);
        for x in 0..2 {
            for y in 0..4 {
                canvas.set_pixel(x, y);
            }
        }
        assert_eq!(canvas.row_to_string(0), "⣿");
    }

    #[test]
    fn test_diagonal_spans_cells() {
        let mut canvas = BrailleCanvas::new(2, 1);
        for i in 0..4 {
            canvas.set_pixel(i, i);
        }
        assert_eq!(canvas.row_to_string(0), "⠑⢄");
    }

    #[test]
    fn test_off_canvas_is_ignored() {
        let mut canvas = BrailleCanvas::new(2, 2);
        canvas.set_pixel(-1, 0);
        canvas.set_pixel(4, 0);
        canvas.set_pixel(0, 8);
        assert!(canvas.is_blank());
        assert_eq!(canvas.cell(2, 0), None);
    }

    #[test]
    fn test_higher_rank_keeps_cell() {
        let mut canvas = BrailleCanvas::new(1, 1);
        canvas.set_tinted(0, 0, RED);
        canvas.set_tinted(1, 1, GREY);
        assert_eq!(canvas.cell(0, 0), Some(('⠑', Some(RED))));

        let mut canvas = BrailleCanvas::new(1, 1);
        canvas.set_tinted(0, 0, GREY);
        canvas.set_tinted(0, 0, RED);
        assert_eq!(canvas.cell(0, 0).and_then(|(_, t)| t), Some(RED));
    }

    #[test]
    fn test_blank_rows_are_full_width() {
        let canvas = BrailleCanvas::new(3, 2);
        assert_eq!(canvas.row_to_string(1), "\u{2800}".repeat(3));
        assert_eq!(canvas.cell(0, 2), None);
    }
}
