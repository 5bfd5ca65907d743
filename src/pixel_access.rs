//! Pixel access — format-tagged color reads for the fill engine.
//!
//! A [`PixelBuffer`] describes its storage with a [`PixelFormatTag`]. Fast
//! formats hand out typed rows; the `Generic` format only answers
//! `get_pixel`. [`PixelAccessor`] inspects the tag once, caches the typed
//! rows (one slice per row, so a read is a double index) and from then on
//! dispatches per run rather than per pixel.
//!
//! Colors are compared as raw integers. There is no tolerance and no alpha
//! handling: two pixels match when their stored values are equal.

use crate::error::{FillError, FillResult};

// ============================================================================
// Buffer capability
// ============================================================================

/// Storage layout of a pixel buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PixelFormatTag {
    /// 4 bytes per pixel, read as `u32`.
    Rgb32,
    /// 2 bytes per pixel, read as `u16`.
    Gray16,
    /// 1 byte per pixel, read as `u8`.
    Indexed8,
    /// No direct row access; pixels come from [`PixelBuffer::get_pixel`].
    Generic,
}

/// A typed row handed out by a fast-format buffer.
#[derive(Debug, Clone, Copy)]
pub enum PixelRow<'a> {
    Rgb32(&'a [u32]),
    Gray16(&'a [u16]),
    Indexed8(&'a [u8]),
}

/// Read-side capability the fill engine consumes.
///
/// Fast formats must return a row of at least `width()` elements of the
/// matching type for every `y` in `[0, height)`. `Generic` buffers leave
/// `row` at its default and implement `get_pixel`.
pub trait PixelBuffer {
    fn width(&self) -> u32;
    fn height(&self) -> u32;
    fn format(&self) -> PixelFormatTag;

    /// Row `y` for fast formats.
    fn row(&self, y: u32) -> Option<PixelRow<'_>> {
        let _ = y;
        None
    }

    /// Raw color at (x, y). Only called with in-bounds coordinates.
    fn get_pixel(&self, x: i32, y: i32) -> u32;
}

impl<B: PixelBuffer + ?Sized> PixelBuffer for &B {
    fn width(&self) -> u32 {
        (**self).width()
    }

    fn height(&self) -> u32 {
        (**self).height()
    }

    fn format(&self) -> PixelFormatTag {
        (**self).format()
    }

    fn row(&self, y: u32) -> Option<PixelRow<'_>> {
        (**self).row(y)
    }

    fn get_pixel(&self, x: i32, y: i32) -> u32 {
        (**self).get_pixel(x, y)
    }
}

/// Width and height as `i32` coordinates.
///
/// Fails with [`FillError::InvalidLayout`] when a dimension is past
/// `i32::MAX`, since such a column or row could not be addressed.
pub fn addressable_size(width: u32, height: u32) -> FillResult<(i32, i32)> {
    match (i32::try_from(width), i32::try_from(height)) {
        (Ok(w), Ok(h)) => Ok((w, h)),
        _ => Err(FillError::invalid_layout(format!(
            "{}x{} exceeds i32 coordinates",
            width, height
        ))),
    }
}

// ============================================================================
// PixelAccessor
// ============================================================================

enum Rows<'a, B: ?Sized> {
    Rgb32(Vec<&'a [u32]>),
    Gray16(Vec<&'a [u16]>),
    Indexed8(Vec<&'a [u8]>),
    Generic(&'a B),
}

/// Color reader selected once per fill from the buffer's format tag.
pub struct PixelAccessor<'a, B: ?Sized> {
    rows: Rows<'a, B>,
    width: i32,
    height: i32,
}

impl<'a, B: PixelBuffer + ?Sized> PixelAccessor<'a, B> {
    /// Validate the buffer against its tag and cache its rows.
    ///
    /// Fails with [`FillError::UnsupportedFormat`] when a fast-format buffer
    /// does not supply a full row of the right element type for every `y`.
    pub fn new(buffer: &'a B) -> FillResult<Self> {
        let (width, height) = addressable_size(buffer.width(), buffer.height())?;
        let format = buffer.format();
        let rows = match format {
            PixelFormatTag::Rgb32 => Rows::Rgb32(cache_rows(buffer, format, |r| match r {
                PixelRow::Rgb32(s) => Some(s),
                _ => None,
            })?),
            PixelFormatTag::Gray16 => Rows::Gray16(cache_rows(buffer, format, |r| match r {
                PixelRow::Gray16(s) => Some(s),
                _ => None,
            })?),
            PixelFormatTag::Indexed8 => Rows::Indexed8(cache_rows(buffer, format, |r| match r {
                PixelRow::Indexed8(s) => Some(s),
                _ => None,
            })?),
            PixelFormatTag::Generic => Rows::Generic(buffer),
        };
        Ok(Self {
            rows,
            width,
            height,
        })
    }

    pub fn height(&self) -> i32 {
        self.height
    }

    /// Raw color at (x, y).
    ///
    /// # Panics
    /// If (x, y) lies outside the buffer.
    pub fn sample_color(&self, x: i32, y: i32) -> u32 {
        assert!(
            x >= 0 && x < self.width && y >= 0 && y < self.height,
            "pixel ({}, {}) out of bounds ({}x{})",
            x,
            y,
            self.width,
            self.height
        );
        match &self.rows {
            Rows::Rgb32(rows) => rows[y as usize][x as usize],
            Rows::Gray16(rows) => u32::from(rows[y as usize][x as usize]),
            Rows::Indexed8(rows) => u32::from(rows[y as usize][x as usize]),
            Rows::Generic(buffer) => buffer.get_pixel(x, y),
        }
    }

    /// Maximal run of `color` on row `y` through column `x`.
    ///
    /// Returns inclusive bounds, or `None` when (x, y) itself does not match.
    /// The scan stops at the buffer edges.
    pub fn scan_run(&self, x: i32, y: i32, color: u32) -> Option<(i32, i32)> {
        debug_assert!(x >= 0 && x < self.width && y >= 0 && y < self.height);
        match &self.rows {
            Rows::Rgb32(rows) => scan_slice(rows[y as usize], x as usize, color),
            Rows::Gray16(rows) => scan_slice(rows[y as usize], x as usize, color),
            Rows::Indexed8(rows) => scan_slice(rows[y as usize], x as usize, color),
            Rows::Generic(buffer) => {
                if buffer.get_pixel(x, y) != color {
                    return None;
                }
                let mut left = x;
                while left > 0 && buffer.get_pixel(left - 1, y) == color {
                    left -= 1;
                }
                let mut right = x;
                while right + 1 < self.width && buffer.get_pixel(right + 1, y) == color {
                    right += 1;
                }
                Some((left, right))
            }
        }
    }
}

fn cache_rows<'a, B, T>(
    buffer: &'a B,
    format: PixelFormatTag,
    pick: impl Fn(PixelRow<'a>) -> Option<&'a [T]>,
) -> FillResult<Vec<&'a [T]>>
where
    B: PixelBuffer + ?Sized,
{
    let width = buffer.width() as usize;
    let mut rows = Vec::new();
    rows.try_reserve_exact(buffer.height() as usize)?;
    for y in 0..buffer.height() {
        let row = buffer.row(y).and_then(&pick).ok_or_else(|| {
            FillError::unsupported_format(
                format,
                format!("row {} is missing or has the wrong element type", y),
            )
        })?;
        if row.len() < width {
            return Err(FillError::unsupported_format(
                format,
                format!("row {} holds {} pixels, width is {}", y, row.len(), width),
            ));
        }
        rows.push(&row[..width]);
    }
    Ok(rows)
}

#[inline]
fn scan_slice<T: Copy + Into<u32>>(row: &[T], x: usize, color: u32) -> Option<(i32, i32)> {
    let matches = |p: &T| (*p).into() == color;
    if !matches(&row[x]) {
        return None;
    }
    let left = row[..x]
        .iter()
        .rposition(|p| !matches(p))
        .map_or(0, |i| i + 1);
    let right = row[x + 1..]
        .iter()
        .position(|p| !matches(p))
        .map_or(row.len() - 1, |i| x + i);
    Some((left as i32, right as i32))
}

/// Report one discovered run `[x0, x1]` on row `y` to the caller.
#[inline]
pub fn emit_run<F: FnMut(i32, i32, i32)>(x0: i32, x1: i32, y: i32, on_run: &mut F) {
    debug_assert!(x0 <= x1);
    tracing::trace!(x0, x1, y, "run");
    on_run(x0, x1, y);
}

// ============================================================================
// Tests
// ============================================================================
