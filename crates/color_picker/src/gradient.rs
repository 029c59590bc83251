use crate::color::{Rgb, clamp01, hsv_to_rgb};
use crate::error::{Error, Result};
use tiny_skia::{Pixmap, PremultipliedColorU8};

/// Map a normalized coordinate to a pixel index in `0..dimension`.
///
/// `1.0` lands on the last pixel instead of one past the end.
pub fn pixel_index(normalized: f32, dimension: u32) -> u32 {
    if dimension == 0 {
        return 0;
    }
    let index = (clamp01(normalized) * dimension as f32).floor() as u32;
    index.min(dimension - 1)
}

/// A `width` x `height` buffer of RGB samples.
///
/// Row `y = 0` holds value 0, so the buffer is stored bottom-up compared to
/// how it is shown on screen.
#[derive(Debug, Clone, PartialEq)]
pub struct GradientImage {
    width: u32,
    height: u32,
    pixels: Vec<Rgb>,
}

impl GradientImage {
    /// Allocate a black image.
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            pixels: vec![Rgb::BLACK; width as usize * height as usize],
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn pixels(&self) -> &[Rgb] {
        &self.pixels
    }

    pub fn pixel(&self, x: u32, y: u32) -> Option<Rgb> {
        if x >= self.width || y >= self.height {
            return None;
        }
        self.pixels
            .get(y as usize * self.width as usize + x as usize)
            .copied()
    }

    /// The pixel under a normalized `(u, v)` coordinate.
    pub fn sample_normalized(&self, u: f32, v: f32) -> Option<Rgb> {
        if self.pixels.is_empty() {
            return None;
        }
        self.pixel(pixel_index(u, self.width), pixel_index(v, self.height))
    }

    /// Fill every row with the hue strip, sample `x` = HSV(x / width, 1, 1).
    pub fn fill_hue_strip(&mut self) {
        let width = self.width as usize;
        if width == 0 {
            return;
        }
        for (ix, pixel) in self.pixels.iter_mut().enumerate() {
            let x = ix % width;
            *pixel = hsv_to_rgb(x as f32 / width as f32, 1.0, 1.0);
        }
    }

    /// Overwrite the buffer with the saturation/value plane at `hue`.
    ///
    /// Saturation runs along x, value along y. The buffer is reused.
    pub fn fill_saturation_value_plane(&mut self, hue: f32) {
        let (width, height) = (self.width, self.height);
        if width == 0 || height == 0 {
            return;
        }
        for y in 0..height {
            let value = y as f32 / height as f32;
            let row = &mut self.pixels[(y * width) as usize..((y + 1) * width) as usize];
            for (x, pixel) in row.iter_mut().enumerate() {
                *pixel = hsv_to_rgb(hue, x as f32 / width as f32, value);
            }
        }
    }

    /// Rasterize into a pixmap, flipped so value 1 ends up on the top row.
    pub fn to_pixmap(&self) -> Option<Pixmap> {
        let mut pixmap = Pixmap::new(self.width, self.height)?;
        self.write_into(&mut pixmap);
        Some(pixmap)
    }

    /// Copy the buffer into an existing pixmap of the same size.
    ///
    /// Returns `false` without touching the pixmap when the sizes differ.
    pub fn write_into(&self, pixmap: &mut Pixmap) -> bool {
        if pixmap.width() != self.width || pixmap.height() != self.height {
            return false;
        }

        let width = self.width as usize;
        let height = self.height as usize;
        let pixels = pixmap.pixels_mut();
        for (ix, rgb) in self.pixels.iter().enumerate() {
            let (x, y) = (ix % width, ix / width);
            let [r, g, b] = rgb.to_rgb8();
            if let Some(pixel) = PremultipliedColorU8::from_rgba(r, g, b, 255) {
                pixels[(height - 1 - y) * width + x] = pixel;
            }
        }
        true
    }

    /// Encode as PNG, top row is value 1.
    pub fn encode_png(&self) -> Result<Vec<u8>> {
        let pixmap = self.to_pixmap().ok_or_else(|| {
            Error::Encode(format!("empty image {}x{}", self.width, self.height))
        })?;
        pixmap
            .encode_png()
            .map_err(|err| Error::Encode(err.to_string()))
    }
}

/// Render the 1-D hue strip, sample `i` = HSV(i / width, 1, 1).
pub fn render_hue_strip(width: u32) -> GradientImage {
    let mut image = GradientImage::new(width, 1);
    image.fill_hue_strip();
    image
}

/// Render the saturation/value plane for `hue`.
///
/// Sample `(x, y)` = HSV(hue, x / width, y / height).
pub fn render_saturation_value_plane(width: u32, height: u32, hue: f32) -> GradientImage {
    let mut image = GradientImage::new(width, height);
    image.fill_saturation_value_plane(hue);
    image
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hue_strip_samples() {
        let strip = render_hue_strip(6);
        assert_eq!(strip.height(), 1);
        assert_eq!(strip.pixels().len(), 6);
        for i in 0..6 {
            assert_eq!(strip.pixel(i, 0), Some(hsv_to_rgb(i as f32 / 6.0, 1.0, 1.0)));
        }
        assert_eq!(strip.pixel(0, 0), Some(Rgb::new(1.0, 0.0, 0.0)));
    }

    #[test]
    fn test_plane_matches_hsv_at_every_pixel() {
        let (width, height, hue) = (16, 12, 0.37);
        let plane = render_saturation_value_plane(width, height, hue);

        for y in 0..height {
            for x in 0..width {
                let expected = hsv_to_rgb(hue, x as f32 / width as f32, y as f32 / height as f32);
                let actual = plane.pixel(x, y).unwrap();
                assert!(actual.max_difference(&expected) < 1e-6, "pixel ({x}, {y})");
            }
        }
        // Bottom row is black, bottom-left corner is value 0.
        assert_eq!(plane.pixel(width - 1, 0), Some(Rgb::BLACK));
    }

    #[test]
    fn test_fill_in_place_keeps_buffer() {
        let mut plane = render_saturation_value_plane(8, 8, 0.0);
        let ptr = plane.pixels().as_ptr();

        plane.fill_saturation_value_plane(0.5);

        assert_eq!(plane.pixels().as_ptr(), ptr);
        assert_eq!(plane, render_saturation_value_plane(8, 8, 0.5));
    }

    #[test]
    fn test_pixel_index_floor_and_clamp() {
        assert_eq!(pixel_index(0.0, 256), 0);
        assert_eq!(pixel_index(0.5, 256), 128);
        assert_eq!(pixel_index(0.999, 256), 255);
        assert_eq!(pixel_index(1.0, 256), 255);
        assert_eq!(pixel_index(-3.0, 256), 0);
        assert_eq!(pixel_index(7.0, 256), 255);
        assert_eq!(pixel_index(0.5, 0), 0);
    }

    #[test]
    fn test_sample_normalized_corners() {
        let plane = render_saturation_value_plane(4, 4, 0.0);
        assert_eq!(plane.sample_normalized(0.0, 0.0), plane.pixel(0, 0));
        assert_eq!(plane.sample_normalized(1.0, 1.0), plane.pixel(3, 3));
        assert_eq!(GradientImage::new(0, 0).sample_normalized(0.5, 0.5), None);
    }

    #[test]
    fn test_pixmap_is_flipped() {
        let plane = render_saturation_value_plane(2, 2, 0.0);
        let pixmap = plane.to_pixmap().unwrap();

        // Top-right on screen is full saturation at value 0.5 (row y = 1).
        let top_right = pixmap.pixel(1, 0).unwrap();
        let [r, g, b] = plane.pixel(1, 1).unwrap().to_rgb8();
        assert_eq!((top_right.red(), top_right.green(), top_right.blue()), (r, g, b));

        let bottom_left = pixmap.pixel(0, 1).unwrap();
        assert_eq!(bottom_left.red(), 0);
        assert_eq!(bottom_left.alpha(), 255);
    }

    #[test]
    fn test_encode_png() {
        let png = render_hue_strip(16).encode_png().unwrap();
        assert_eq!(&png[..8], b"\x89PNG\r\n\x1a\n");
        assert!(GradientImage::new(0, 1).encode_png().is_err());
    }
}
