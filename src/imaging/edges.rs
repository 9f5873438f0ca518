//! Edge extension: the pixel work behind a bleed.
//!
//! The source is pasted at `(bleed_px, bleed_px)` on a canvas one pixel
//! short of `source + 2 * bleed_px` in each direction (see
//! [`bled_canvas_size`](super::calculations::bled_canvas_size)). Then, for
//! every margin offset `b` in `0..bleed_px`:
//!
//! ```text
//!  c c t t t t t t c c      t  copy of the source's top row
//!  c c t t t t t t c c      b  copy of the bottom row
//!  l l S S S S S S r r      l  copy of the left column
//!  l l S S S S S S r r      r  copy of the right column
//!  c c b b b b b b c c      c  nearest source corner pixel
//! ```
//!
//! The margin is always a flat copy of the nearest edge or corner pixel;
//! nothing is blended. Because the canvas is one pixel short, the far-side
//! margins start on the source's last row/column (overwriting it with
//! itself) and are `bleed_px - 1` pixels wide beyond it.

use image::{Rgb, RgbImage, imageops};

use super::calculations::bled_canvas_size;

/// Build the bled canvas for `source`.
pub fn extend_edges(source: &RgbImage, bleed_px: u32, fill: [u8; 3]) -> RgbImage {
    let (w, h) = source.dimensions();
    let (cw, ch) = bled_canvas_size((w, h), bleed_px);
    let mut out = RgbImage::from_pixel(cw, ch, Rgb(fill));
    imageops::replace(&mut out, source, i64::from(bleed_px), i64::from(bleed_px));

    if w == 0 || h == 0 {
        return out;
    }
    let x_max = w - 1;
    let y_max = h - 1;

    for b in 0..bleed_px {
        // top / bottom
        for x in 0..w {
            out.put_pixel(x + bleed_px, b, *source.get_pixel(x, 0));
            out.put_pixel(x + bleed_px, b + y_max + bleed_px, *source.get_pixel(x, y_max));
        }

        // left / right
        for y in 0..h {
            out.put_pixel(b, y + bleed_px, *source.get_pixel(0, y));
            out.put_pixel(b + x_max + bleed_px, y + bleed_px, *source.get_pixel(x_max, y));
        }

        // corners
        for b2 in 0..bleed_px {
            out.put_pixel(b, b2, *source.get_pixel(0, 0));
            out.put_pixel(b + x_max + bleed_px, b2, *source.get_pixel(x_max, 0));
            out.put_pixel(
                b + x_max + bleed_px,
                b2 + y_max + bleed_px,
                *source.get_pixel(x_max, y_max),
            );
            out.put_pixel(b, b2 + y_max + bleed_px, *source.get_pixel(0, y_max));
        }
    }

    out
}
