//! Raster images and the `^GFA` packed bitmap format
//!
//! The printer takes bitmaps as ASCII hex, one bit per dot, MSB first,
//! every row padded to a whole byte. The header is
//! `total,total,bytes_per_row,` followed by the hex payload; the total is
//! deliberately repeated (binary byte count and graphic field count).

use std::fmt;

use tracing::{debug, instrument};

use crate::error::EncodingError;

/// Default luminance threshold on a 0-255 scale
pub const DEFAULT_DARK_THRESHOLD: u8 = 128;

/// RGBA pixel buffer, row-major, top to bottom
///
/// Width and height are always >= 1 and the buffer always holds exactly
/// `width * height * 4` bytes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RasterImage {
    width: u32,
    height: u32,
    pixels: Vec<u8>,
}

impl RasterImage {
    /// Wrap an RGBA buffer, checking dimensions against its length
    pub fn from_rgba(width: u32, height: u32, pixels: Vec<u8>) -> Result<Self, EncodingError> {
        if width == 0 || height == 0 {
            return Err(EncodingError::InvalidDimensions { width, height });
        }

        let expected = width as usize * height as usize * 4;
        if pixels.len() != expected {
            return Err(EncodingError::BufferLength {
                expected,
                actual: pixels.len(),
            });
        }

        Ok(Self {
            width,
            height,
            pixels,
        })
    }

    /// Build an image by evaluating `f(x, y)` for every pixel
    pub fn from_fn(
        width: u32,
        height: u32,
        mut f: impl FnMut(u32, u32) -> [u8; 4],
    ) -> Result<Self, EncodingError> {
        if width == 0 || height == 0 {
            return Err(EncodingError::InvalidDimensions { width, height });
        }

        let mut pixels = Vec::with_capacity(width as usize * height as usize * 4);
        for y in 0..height {
            for x in 0..width {
                pixels.extend_from_slice(&f(x, y));
            }
        }

        Self::from_rgba(width, height, pixels)
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// Raw RGBA bytes
    pub fn pixels(&self) -> &[u8] {
        &self.pixels
    }

    /// RGBA value at (x, y)
    pub fn pixel(&self, x: u32, y: u32) -> [u8; 4] {
        let i = (y as usize * self.width as usize + x as usize) * 4;
        [
            self.pixels[i],
            self.pixels[i + 1],
            self.pixels[i + 2],
            self.pixels[i + 3],
        ]
    }
}

// ============================================================================
// Image file support
// ============================================================================

#[cfg(feature = "image")]
impl RasterImage {
    /// Convert any decoded image into an RGBA raster
    pub fn from_image(img: &image::DynamicImage) -> Result<Self, EncodingError> {
        let rgba = img.to_rgba8();
        let (w, h) = rgba.dimensions();
        Self::from_rgba(w, h, rgba.into_raw())
    }

    /// Load a raster from an image file (PNG, JPEG, ...)
    #[instrument]
    pub fn open(path: &str) -> crate::PrintResult<Self> {
        let img = image::open(path)?;
        debug!(width = img.width(), height = img.height(), "image opened");
        Ok(Self::from_image(&img)?)
    }

    /// Fit the image inside `width` x `height` dots, keeping its aspect ratio
    ///
    /// The letterbox and a `pad`-dot guard rail around it are filled with
    /// white, and any transparency is flattened onto white, so strokes never
    /// touch the bitmap edge.
    pub fn fit_within(&self, width: u32, height: u32, pad: u32) -> Result<Self, EncodingError> {
        use image::{DynamicImage, Rgba, RgbaImage, imageops::FilterType};

        if width == 0 || height == 0 {
            return Err(EncodingError::InvalidDimensions { width, height });
        }

        let src = RgbaImage::from_raw(self.width, self.height, self.pixels.clone()).ok_or(
            EncodingError::BufferLength {
                expected: self.width as usize * self.height as usize * 4,
                actual: self.pixels.len(),
            },
        )?;
        let resized = DynamicImage::ImageRgba8(src)
            .resize(width, height, FilterType::Lanczos3)
            .to_rgba8();

        let mut canvas = RgbaImage::from_pixel(
            width + 2 * pad,
            height + 2 * pad,
            Rgba([255, 255, 255, 255]),
        );
        let ox = pad + (width.saturating_sub(resized.width())) / 2;
        let oy = pad + (height.saturating_sub(resized.height())) / 2;

        for (x, y, p) in resized.enumerate_pixels() {
            let a = p[3] as f32 / 255.0;
            let flatten = |c: u8| (c as f32 * a + 255.0 * (1.0 - a)).round() as u8;
            canvas.put_pixel(
                ox + x,
                oy + y,
                Rgba([flatten(p[0]), flatten(p[1]), flatten(p[2]), 255]),
            );
        }

        let (w, h) = canvas.dimensions();
        Self::from_rgba(w, h, canvas.into_raw())
    }
}

// ============================================================================
// Packed bitmap
// ============================================================================

/// 1-bit-per-dot bitmap in printer row layout
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PackedBitmap {
    width_bytes: usize,
    height: usize,
    data: Vec<u8>,
}

impl PackedBitmap {
    /// Wrap already packed rows
    pub fn from_bytes(width_bytes: usize, data: Vec<u8>) -> Result<Self, EncodingError> {
        if width_bytes == 0 || data.is_empty() || data.len() % width_bytes != 0 {
            return Err(EncodingError::MalformedGraphic(format!(
                "{} bytes do not form rows of {} bytes",
                data.len(),
                width_bytes
            )));
        }

        Ok(Self {
            width_bytes,
            height: data.len() / width_bytes,
            data,
        })
    }

    /// Parse a `^GFA` literal (`^GFA,` prefix optional)
    pub fn parse_gfa(s: &str) -> Result<Self, EncodingError> {
        let body = s.trim();
        let body = body.strip_prefix("^GFA,").unwrap_or(body);

        let mut parts = body.splitn(4, ',');
        let mut number = |name: &str| -> Result<usize, EncodingError> {
            parts
                .next()
                .and_then(|p| p.trim().parse().ok())
                .ok_or_else(|| EncodingError::MalformedGraphic(format!("bad {} field", name)))
        };
        let binary_bytes = number("byte count")?;
        let field_bytes = number("field count")?;
        let width_bytes = number("bytes per row")?;

        let payload = parts
            .next()
            .ok_or_else(|| EncodingError::MalformedGraphic("missing payload".to_string()))?;
        let data = hex::decode(payload.trim())
            .map_err(|e| EncodingError::MalformedGraphic(e.to_string()))?;

        if binary_bytes != field_bytes || binary_bytes != data.len() {
            return Err(EncodingError::MalformedGraphic(format!(
                "header says {}/{} bytes, payload has {}",
                binary_bytes,
                field_bytes,
                data.len()
            )));
        }

        Self::from_bytes(width_bytes, data)
    }

    /// Bytes per row (`ceil(width / 8)`)
    pub fn width_bytes(&self) -> usize {
        self.width_bytes
    }

    /// Rows
    pub fn height(&self) -> usize {
        self.height
    }

    /// Width in dots including row padding
    pub fn dot_width(&self) -> usize {
        self.width_bytes * 8
    }

    pub fn total_bytes(&self) -> usize {
        self.data.len()
    }

    pub fn bytes(&self) -> &[u8] {
        &self.data
    }

    /// Whether the dot at (x, y) prints
    pub fn is_dark(&self, x: usize, y: usize) -> bool {
        let byte = self.data[y * self.width_bytes + x / 8];
        byte & (0x80 >> (x % 8)) != 0
    }

    /// Uppercase hex payload
    pub fn hex(&self) -> String {
        hex::encode_upper(&self.data)
    }
}

/// `total,total,bytes_per_row,HEX`, the `^GFA` parameters after the `A`
impl fmt::Display for PackedBitmap {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let total = self.total_bytes();
        write!(f, "{},{},{},{}", total, total, self.width_bytes, self.hex())
    }
}

// ============================================================================
// Encoder
// ============================================================================

/// Whether one RGBA pixel prints at the given threshold
///
/// Luminance is blended toward white by transparency; a fully transparent
/// pixel never prints.
fn is_dark_pixel(px: &[u8], threshold: u8) -> bool {
    let (r, g, b, a) = (px[0] as f64, px[1] as f64, px[2] as f64, px[3]);
    if a == 0 {
        return false;
    }

    let luma = (r * 299.0 + g * 587.0 + b * 114.0) / 1000.0;
    let alpha = a as f64 / 255.0;
    let effective = (1.0 - alpha) * 255.0 + alpha * luma;

    effective < threshold as f64
}

/// Binarize and pack a raster into printer bitmap rows
#[instrument(skip(image), fields(width = image.width(), height = image.height()))]
pub fn encode(image: &RasterImage, dark_threshold: u8) -> PackedBitmap {
    let width = image.width as usize;
    let width_bytes = width.div_ceil(8);

    let mut data = Vec::with_capacity(width_bytes * image.height as usize);
    for row in image.pixels.chunks_exact(width * 4) {
        let mut packed = vec![0u8; width_bytes];
        for (x, px) in row.chunks_exact(4).enumerate() {
            if is_dark_pixel(px, dark_threshold) {
                packed[x / 8] |= 0x80 >> (x % 8);
            }
        }
        data.extend_from_slice(&packed);
    }

    debug!(width_bytes, total_bytes = data.len(), "raster packed");

    PackedBitmap {
        width_bytes,
        height: image.height as usize,
        data,
    }
}

/// Encode a raw RGBA buffer, rejecting bad dimensions
pub fn encode_rgba(
    width: u32,
    height: u32,
    pixels: Vec<u8>,
    dark_threshold: u8,
) -> Result<PackedBitmap, EncodingError> {
    let image = RasterImage::from_rgba(width, height, pixels)?;
    Ok(encode(&image, dark_threshold))
}

#[cfg(test)]
mod tests {
    use super::*;

    const BLACK: [u8; 4] = [0, 0, 0, 255];
    const WHITE: [u8; 4] = [255, 255, 255, 255];

    fn checkerboard(size: u32) -> RasterImage {
        RasterImage::from_fn(size, size, |x, y| {
            if (x + y) % 2 == 0 { BLACK } else { WHITE }
        })
        .unwrap()
    }

    #[test]
    fn test_checkerboard_reproduced() {
        let img = checkerboard(4);

        for threshold in [128, 255] {
            let packed = encode(&img, threshold);
            assert_eq!(packed.width_bytes(), 1);
            assert_eq!(packed.height(), 4);
            for y in 0..4 {
                for x in 0..4 {
                    assert_eq!(
                        packed.is_dark(x, y),
                        (x + y) % 2 == 0,
                        "threshold {} at ({}, {})",
                        threshold,
                        x,
                        y
                    );
                }
            }
        }
    }

    #[test]
    fn test_threshold_zero_prints_nothing() {
        let packed = encode(&checkerboard(4), 0);
        assert!(packed.bytes().iter().all(|b| *b == 0));
    }

    #[test]
    fn test_checkerboard_bytes() {
        let packed = encode(&checkerboard(4), 128);
        // 1010 / 0101 with four padding zeros
        assert_eq!(packed.bytes(), &[0xA0, 0x50, 0xA0, 0x50]);
        assert_eq!(packed.to_string(), "4,4,1,A050A050");
    }

    #[test]
    fn test_row_padding_is_zero() {
        for width in [1u32, 7, 9, 13, 15, 17, 31] {
            let img = RasterImage::from_fn(width, 3, |_, _| BLACK).unwrap();
            let packed = encode(&img, 128);

            let wb = (width as usize).div_ceil(8);
            assert_eq!(packed.width_bytes(), wb);
            assert_eq!(packed.total_bytes(), wb * 3);

            for y in 0..3 {
                for x in 0..width as usize {
                    assert!(packed.is_dark(x, y));
                }
                for x in width as usize..wb * 8 {
                    assert!(!packed.is_dark(x, y), "padding bit {} set", x);
                }
            }
        }
    }

    #[test]
    fn test_transparent_is_background() {
        let img = RasterImage::from_fn(8, 1, |x, _| {
            if x < 4 { [0, 0, 0, 0] } else { [0, 0, 0, 255] }
        })
        .unwrap();

        let packed = encode(&img, 255);
        assert_eq!(packed.bytes(), &[0x0F]);
    }

    #[test]
    fn test_partial_alpha_blends_toward_white() {
        // Black at ~40% coverage: effective luminance ~153
        let img = RasterImage::from_fn(1, 1, |_, _| [0, 0, 0, 102]).unwrap();
        assert!(!encode(&img, 128).is_dark(0, 0));
        assert!(encode(&img, 180).is_dark(0, 0));
    }

    #[test]
    fn test_luminance_weights() {
        // Pure green: 0.587 * 255 = 149.7
        let img = RasterImage::from_fn(1, 1, |_, _| [0, 255, 0, 255]).unwrap();
        assert!(!encode(&img, 128).is_dark(0, 0));
        assert!(encode(&img, 150).is_dark(0, 0));

        // Pure blue: 0.114 * 255 = 29.1
        let img = RasterImage::from_fn(1, 1, |_, _| [0, 0, 255, 255]).unwrap();
        assert!(encode(&img, 30).is_dark(0, 0));
        assert!(!encode(&img, 29).is_dark(0, 0));
    }

    #[test]
    fn test_invalid_dimensions() {
        assert_eq!(
            RasterImage::from_rgba(0, 4, vec![]),
            Err(EncodingError::InvalidDimensions {
                width: 0,
                height: 4
            })
        );
        assert_eq!(
            encode_rgba(2, 2, vec![0; 15], 128),
            Err(EncodingError::BufferLength {
                expected: 16,
                actual: 15
            })
        );
    }

    #[test]
    fn test_parse_gfa() {
        let bm = PackedBitmap::parse_gfa("^GFA,4,4,2,80FF0001").unwrap();
        assert_eq!(bm.width_bytes(), 2);
        assert_eq!(bm.height(), 2);
        assert_eq!(bm.dot_width(), 16);
        assert!(bm.is_dark(0, 0));
        assert!(!bm.is_dark(1, 0));
        assert!(bm.is_dark(15, 1));
        assert_eq!(bm.to_string(), "4,4,2,80FF0001");
    }

    #[test]
    fn test_parse_gfa_rejects_mismatch() {
        assert!(PackedBitmap::parse_gfa("^GFA,4,4,2,80FF00").is_err());
        assert!(PackedBitmap::parse_gfa("4,3,2,80FF0001").is_err());
        assert!(PackedBitmap::parse_gfa("4,4,3,80FF0001").is_err());
        assert!(PackedBitmap::parse_gfa("4,4,2,XYZW0001").is_err());
        assert!(PackedBitmap::parse_gfa("4,4").is_err());
    }

    #[cfg(feature = "image")]
    #[test]
    fn test_fit_within_letterboxes_on_white() {
        // 4x2 black, transparent background nowhere
        let img = RasterImage::from_fn(4, 2, |_, _| BLACK).unwrap();
        let fitted = img.fit_within(8, 8, 1).unwrap();

        assert_eq!(fitted.width(), 10);
        assert_eq!(fitted.height(), 10);
        // Guard rail is white
        assert_eq!(fitted.pixel(0, 0), WHITE);
        assert_eq!(fitted.pixel(9, 9), WHITE);
        // Letterbox top band is white, centre is dark
        assert_eq!(fitted.pixel(5, 1), WHITE);
        assert!(encode(&fitted, 128).is_dark(5, 5));
    }
}
