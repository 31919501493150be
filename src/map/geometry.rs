use crate::braille::{BrailleCanvas, Tint};

/// Bresenham line between two pixel positions
pub fn draw_line(canvas: &mut BrailleCanvas, (x0, y0): (i32, i32), (x1, y1): (i32, i32)) {
    let dx = (x1 - x0).abs();
    let dy = -(y1 - y0).abs();
    let sx = if x0 < x1 { 1 } else { -1 };
    let sy = if y0 < y1 { 1 } else { -1 };
    let mut err = dx + dy;
    let (mut x, mut y) = (x0, y0);

    loop {
        canvas.set_pixel(x, y);
        if x == x1 && y == y1 {
            break;
        }
        let e2 = 2 * err;
        if e2 >= dy {
            err += dy;
            x += sx;
        }
        if e2 <= dx {
            err += dx;
            y += sy;
        }
    }
}

/// Filled disc, clipped to the canvas
pub fn fill_disc(canvas: &mut BrailleCanvas, cx: i32, cy: i32, radius: i32, tint: Tint) {
    let r2 = radius * radius;
    let max_x = canvas.pixel_width() as i32;
    let max_y = canvas.pixel_height() as i32;

    for dy in -radius..=radius {
        let y = cy + dy;
        if y < 0 || y >= max_y {
            continue;
        }
        for dx in -radius..=radius {
            let x = cx + dx;
            if (0..max_x).contains(&x) && dx * dx + dy * dy <= r2 {
                canvas.set_tinted(x, y, tint);
            }
        }
    }
}
