use crate::{Layout, PixelBox, RecognizeError, Size};
use image::{GrayImage, Luma, RgbImage};
use serde::Serialize;

/// A binarized glyph: one byte per pixel, 1 for ink and 0 for background,
/// row-major.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Bitmap {
    width: u32,
    height: u32,
    pixels: Vec<u8>,
}

impl Bitmap {
    /// All-background bitmap
    pub fn blank(width: u32, height: u32) -> Self {
        Bitmap {
            width,
            height,
            pixels: vec![0; (width * height) as usize],
        }
    }

    pub fn from_fn(width: u32, height: u32, mut ink: impl FnMut(u32, u32) -> bool) -> Self {
        let mut pixels = Vec::with_capacity((width * height) as usize);
        for y in 0..height {
            for x in 0..width {
                pixels.push(u8::from(ink(x, y)));
            }
        }
        Bitmap {
            width,
            height,
            pixels,
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn size(&self) -> Size {
        Size::new(self.width, self.height)
    }

    pub fn get(&self, x: u32, y: u32) -> bool {
        self.pixels[(y * self.width + x) as usize] != 0
    }

    fn set(&mut self, x: u32, y: u32, value: u8) {
        self.pixels[(y * self.width + x) as usize] = value;
    }

    /// Number of ink pixels
    pub fn count(&self) -> usize {
        self.pixels.iter().filter(|&&p| p != 0).count()
    }

    /// Copy moved by `(dx, dy)`. Pixels pushed past an edge are lost and
    /// the uncovered strip is background.
    pub fn shift(&self, dx: i32, dy: i32) -> Bitmap {
        let mut out = Bitmap::blank(self.width, self.height);
        let (w, h) = (self.width as i64, self.height as i64);
        for y in 0..h {
            let ny = y + dy as i64;
            if ny < 0 || ny >= h {
                continue;
            }
            for x in 0..w {
                let nx = x + dx as i64;
                if nx < 0 || nx >= w {
                    continue;
                }
                out.pixels[(ny * w + nx) as usize] = self.pixels[(y * w + x) as usize];
            }
        }
        out
    }

    fn check_same_size(&self, other: &Bitmap) -> Result<(), RecognizeError> {
        if self.size() == other.size() {
            Ok(())
        } else {
            Err(RecognizeError::Dimension {
                what: "glyph",
                expected: self.size(),
                actual: other.size(),
            })
        }
    }
}

/// Classify the pixels of `area` as ink or background.
///
/// A pixel is ink when its mean channel value is under the black threshold
/// or its mean channel distance from the reference red is under the red
/// threshold. A `layout.corner`-sized square at each corner is then cleared,
/// since anything there is border rather than glyph.
pub fn binarize(image: &RgbImage, area: PixelBox, layout: &Layout) -> Bitmap {
    let [rr, rg, rb] = layout.reference_red.map(i32::from);
    let mut bitmap = Bitmap::from_fn(area.width(), area.height(), |x, y| {
        let [r, g, b] = image.get_pixel(area.x1 + x, area.y1 + y).0.map(i32::from);
        let black_err = (r + g + b) as f64 / 3.0;
        let red_err = ((r - rr).abs() + (g - rg).abs() + (b - rb).abs()) as f64 / 3.0;
        black_err < layout.black_threshold || red_err < layout.red_threshold
    });

    let (w, h) = (bitmap.width, bitmap.height);
    let corner = layout.corner.min(w).min(h);
    for x in 0..corner {
        for y in 0..corner {
            bitmap.set(x, y, 0);
            bitmap.set(w - 1 - x, y, 0);
            bitmap.set(x, h - 1 - y, 0);
            bitmap.set(w - 1 - x, h - 1 - y, 0);
        }
    }
    bitmap
}

/// Root-mean-square difference between two equally sized bitmaps
pub fn rmse(a: &Bitmap, b: &Bitmap) -> Result<f64, RecognizeError> {
    a.check_same_size(b)?;
    if a.pixels.is_empty() {
        return Ok(0.0);
    }
    let differing = a
        .pixels
        .iter()
        .zip(&b.pixels)
        .filter(|(p, q)| p != q)
        .count();
    Ok((differing as f64 / a.pixels.len() as f64).sqrt())
}

/// Bitmap with ink wherever `a` and `b` differ
pub fn binary_diff(a: &Bitmap, b: &Bitmap) -> Result<Bitmap, RecognizeError> {
    a.check_same_size(b)?;
    Ok(Bitmap {
        width: a.width,
        height: a.height,
        pixels: a.pixels.iter().zip(&b.pixels).map(|(p, q)| u8::from(p != q)).collect(),
    })
}

/// Render a bitmap as black ink on white, for inspection
pub fn to_image(bitmap: &Bitmap) -> GrayImage {
    GrayImage::from_fn(bitmap.width, bitmap.height, |x, y| {
        Luma([if bitmap.get(x, y) { 0 } else { 255 }])
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgb;

    fn layout_with_corner(corner: u32) -> Layout {
        Layout {
            corner,
            ..Layout::iphone6()
        }
    }

    #[test]
    fn test_binarize_colours() {
        let colours = [
            [0, 0, 0],       // black
            [26, 26, 23],    // antialiased black
            [229, 15, 34],   // red
            [231, 87, 84],   // pale red
            [232, 236, 196], // background
            [136, 134, 113], // grey fringe
            [236, 220, 187], // pinkish background
        ];
        let image = RgbImage::from_fn(colours.len() as u32, 1, |x, _| Rgb(colours[x as usize]));
        let bitmap = binarize(
            &image,
            PixelBox::new(0, 0, colours.len() as u32 - 1, 0),
            &layout_with_corner(0),
        );
        let ink: Vec<bool> = (0..colours.len() as u32).map(|x| bitmap.get(x, 0)).collect();
        assert_eq!(ink, [true, true, true, true, false, false, false]);
    }

    #[test]
    fn test_binarize_clears_corners() {
        let image = RgbImage::from_pixel(10, 12, Rgb([0, 0, 0]));
        let bitmap = binarize(&image, PixelBox::new(0, 0, 9, 11), &layout_with_corner(4));
        assert_eq!(bitmap.size(), Size::new(10, 12));
        assert!(!bitmap.get(0, 0));
        assert!(!bitmap.get(3, 3));
        assert!(!bitmap.get(9, 11));
        assert!(!bitmap.get(6, 8));
        assert!(bitmap.get(4, 0));
        assert!(bitmap.get(5, 5));
        assert_eq!(bitmap.count(), 120 - 4 * 16);
    }

    #[test]
    fn test_binarize_reads_sub_area() {
        let image = RgbImage::from_fn(6, 6, |x, y| {
            if x >= 3 && y >= 3 {
                Rgb([0, 0, 0])
            } else {
                Rgb([232, 236, 196])
            }
        });
        let bitmap = binarize(&image, PixelBox::new(2, 2, 4, 4), &layout_with_corner(0));
        assert_eq!(bitmap.size(), Size::new(3, 3));
        assert_eq!(bitmap.count(), 4);
        assert!(!bitmap.get(0, 0));
        assert!(bitmap.get(2, 2));
    }

    #[test]
    fn test_shift() {
        let bitmap = Bitmap::from_fn(3, 2, |x, y| x == 0 || y == 1);
        let right = bitmap.shift(1, 0);
        assert_eq!(right, Bitmap::from_fn(3, 2, |x, y| x == 1 || (y == 1 && x > 0)));
        let up = bitmap.shift(0, -1);
        assert_eq!(up, Bitmap::from_fn(3, 2, |_, y| y == 0));
        assert_eq!(bitmap.shift(0, 0), bitmap);
        assert_eq!(bitmap.shift(5, 0).count(), 0);
    }

    #[test]
    fn test_rmse_and_diff() {
        let a = Bitmap::from_fn(4, 4, |x, _| x < 2);
        let b = Bitmap::from_fn(4, 4, |x, y| x < 2 || (x == 3 && y == 3));
        assert_eq!(rmse(&a, &a).unwrap(), 0.0);
        assert!((rmse(&a, &b).unwrap() - 0.25).abs() < 1e-12);

        let diff = binary_diff(&a, &b).unwrap();
        assert_eq!(diff.count(), 1);
        assert!(diff.get(3, 3));

        let small = Bitmap::blank(2, 2);
        assert!(matches!(rmse(&a, &small), Err(RecognizeError::Dimension { .. })));
        assert!(binary_diff(&a, &small).is_err());
    }

    #[test]
    fn test_to_image() {
        let bitmap = Bitmap::from_fn(2, 1, |x, _| x == 0);
        let image = to_image(&bitmap);
        assert_eq!(image.get_pixel(0, 0), &Luma([0]));
        assert_eq!(image.get_pixel(1, 0), &Luma([255]));
    }
}
