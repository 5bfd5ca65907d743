//! Rendering buffers — row-oriented views over caller-owned pixel memory.
//!
//! Three [`PixelBuffer`] implementations are provided:
//!
//! - [`RowAccessor`]: read-only typed view, one element per pixel.
//! - [`RowAccessorMut`]: the same over a mutable slice, with `copy_hline`
//!   for painting discovered runs.
//! - [`GenericBuffer`]: no direct row storage; every pixel is read through a
//!   closure. This is the slow path of the fill engine.
//!
//! Both typed views support positive strides (top-down) and negative strides
//! (bottom-up, e.g. BMP format). Strides are counted in pixels, not bytes.

use crate::error::{FillError, FillResult};
use crate::pixel_access::{addressable_size, PixelBuffer, PixelFormatTag, PixelRow};

// ============================================================================
// Pixel element types
// ============================================================================

/// Element type of a fast-path buffer.
///
/// Each implementation fixes the format tag, so a typed view can never
/// report a tag that disagrees with its storage.
pub trait Pixel: Copy + Into<u32> {
    const FORMAT: PixelFormatTag;

    fn wrap_row(row: &[Self]) -> PixelRow<'_>;
}

impl Pixel for u32 {
    const FORMAT: PixelFormatTag = PixelFormatTag::Rgb32;

    fn wrap_row(row: &[u32]) -> PixelRow<'_> {
        PixelRow::Rgb32(row)
    }
}

impl Pixel for u16 {
    const FORMAT: PixelFormatTag = PixelFormatTag::Gray16;

    fn wrap_row(row: &[u16]) -> PixelRow<'_> {
        PixelRow::Gray16(row)
    }
}

impl Pixel for u8 {
    const FORMAT: PixelFormatTag = PixelFormatTag::Indexed8;

    fn wrap_row(row: &[u8]) -> PixelRow<'_> {
        PixelRow::Indexed8(row)
    }
}

// ============================================================================
// Layout
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Layout {
    width: u32,
    height: u32,
    stride: i32,
}

impl Layout {
    fn new(len: usize, width: u32, height: u32, stride: i32) -> FillResult<Self> {
        addressable_size(width, height)?;
        let stride_abs = stride.unsigned_abs() as usize;
        if height > 0 && (width as usize) > stride_abs {
            return Err(FillError::invalid_layout(format!(
                "stride {} is shorter than width {}",
                stride, width
            )));
        }
        let needed = match height {
            0 => 0,
            h => (h as usize - 1) * stride_abs + width as usize,
        };
        if len < needed {
            return Err(FillError::invalid_layout(format!(
                "{}x{} with stride {} needs {} pixels, slice holds {}",
                width, height, stride, needed, len
            )));
        }
        Ok(Self {
            width,
            height,
            stride,
        })
    }

    /// Stride of tightly packed top-down rows.
    fn packed_stride(width: u32) -> FillResult<i32> {
        i32::try_from(width).map_err(|_| {
            FillError::invalid_layout(format!("width {} exceeds i32 coordinates", width))
        })
    }

    /// Index of the first pixel of row `y`.
    #[inline]
    fn row_start(&self, y: u32) -> usize {
        assert!(
            y < self.height,
            "row {} out of bounds (height={})",
            y,
            self.height
        );
        let stride_abs = self.stride.unsigned_abs() as usize;
        if self.stride < 0 {
            (self.height - 1 - y) as usize * stride_abs
        } else {
            y as usize * stride_abs
        }
    }
}

// ============================================================================
// RowAccessor
// ============================================================================

/// Read-only row accessor over a typed pixel slice.
#[derive(Debug, Clone, Copy)]
pub struct RowAccessor<'a, T> {
    data: &'a [T],
    layout: Layout,
}

impl<'a, T: Pixel> RowAccessor<'a, T> {
    /// Attach to `data`, laid out as `height` rows of `stride` pixels.
    ///
    /// A negative stride means row 0 is stored last.
    pub fn new(data: &'a [T], width: u32, height: u32, stride: i32) -> FillResult<Self> {
        let layout = Layout::new(data.len(), width, height, stride)?;
        Ok(Self { data, layout })
    }

    /// Attach to tightly packed top-down rows.
    pub fn packed(data: &'a [T], width: u32, height: u32) -> FillResult<Self> {
        Self::new(data, width, height, Layout::packed_stride(width)?)
    }

    pub fn width(&self) -> u32 {
        self.layout.width
    }

    pub fn height(&self) -> u32 {
        self.layout.height
    }

    pub fn stride(&self) -> i32 {
        self.layout.stride
    }

    /// The `width` pixels of row `y`.
    pub fn row_slice(&self, y: u32) -> &'a [T] {
        let start = self.layout.row_start(y);
        &self.data[start..start + self.layout.width as usize]
    }
}

impl<T: Pixel> PixelBuffer for RowAccessor<'_, T> {
    fn width(&self) -> u32 {
        self.layout.width
    }

    fn height(&self) -> u32 {
        self.layout.height
    }

    fn format(&self) -> PixelFormatTag {
        T::FORMAT
    }

    fn row(&self, y: u32) -> Option<PixelRow<'_>> {
        Some(T::wrap_row(self.row_slice(y)))
    }

    fn get_pixel(&self, x: i32, y: i32) -> u32 {
        self.row_slice(y as u32)[x as usize].into()
    }
}

// ============================================================================
// RowAccessorMut
// ============================================================================

/// Row accessor over a mutable typed pixel slice.
#[derive(Debug)]
pub struct RowAccessorMut<'a, T> {
    data: &'a mut [T],
    layout: Layout,
}

impl<'a, T: Pixel> RowAccessorMut<'a, T> {
    pub fn new(data: &'a mut [T], width: u32, height: u32, stride: i32) -> FillResult<Self> {
        let layout = Layout::new(data.len(), width, height, stride)?;
        Ok(Self { data, layout })
    }

    pub fn packed(data: &'a mut [T], width: u32, height: u32) -> FillResult<Self> {
        Self::new(data, width, height, Layout::packed_stride(width)?)
    }

    pub fn width(&self) -> u32 {
        self.layout.width
    }

    pub fn height(&self) -> u32 {
        self.layout.height
    }

    pub fn stride(&self) -> i32 {
        self.layout.stride
    }

    /// Borrow as a read-only accessor.
    pub fn as_accessor(&self) -> RowAccessor<'_, T> {
        RowAccessor {
            data: &self.data[..],
            layout: self.layout,
        }
    }

    pub fn row_slice(&self, y: u32) -> &[T] {
        let start = self.layout.row_start(y);
        &self.data[start..start + self.layout.width as usize]
    }

    pub fn row_slice_mut(&mut self, y: u32) -> &mut [T] {
        let start = self.layout.row_start(y);
        &mut self.data[start..start + self.layout.width as usize]
    }

    /// Overwrite `len` pixels of row `y` starting at `x` with `value`.
    pub fn copy_hline(&mut self, x: i32, y: i32, len: u32, value: T) {
        let row = self.row_slice_mut(y as u32);
        row[x as usize..x as usize + len as usize].fill(value);
    }

    /// Set every pixel of the view to `value`.
    pub fn clear(&mut self, value: T) {
        for y in 0..self.layout.height {
            self.row_slice_mut(y).fill(value);
        }
    }
}

impl<T: Pixel> PixelBuffer for RowAccessorMut<'_, T> {
    fn width(&self) -> u32 {
        self.layout.width
    }

    fn height(&self) -> u32 {
        self.layout.height
    }

    fn format(&self) -> PixelFormatTag {
        T::FORMAT
    }

    fn row(&self, y: u32) -> Option<PixelRow<'_>> {
        Some(T::wrap_row(self.row_slice(y)))
    }

    fn get_pixel(&self, x: i32, y: i32) -> u32 {
        self.row_slice(y as u32)[x as usize].into()
    }
}

// ============================================================================
// GenericBuffer
// ============================================================================

/// Buffer whose pixels are only reachable through a getter.
pub struct GenericBuffer<F> {
    width: u32,
    height: u32,
    get: F,
}

impl<F: Fn(i32, i32) -> u32> GenericBuffer<F> {
    pub fn new(width: u32, height: u32, get: F) -> Self {
        Self { width, height, get }
    }
}

impl<F: Fn(i32, i32) -> u32> PixelBuffer for GenericBuffer<F> {
    fn width(&self) -> u32 {
        self.width
    }

    fn height(&self) -> u32 {
        self.height
    }

    fn format(&self) -> PixelFormatTag {
        PixelFormatTag::Generic
    }

    fn get_pixel(&self, x: i32, y: i32) -> u32 {
        (self.get)(x, y)
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_row_accessor_basic() {
        let data = vec![0u32; 40];
        let rb = RowAccessor::new(&data, 10, 4, 10).unwrap();
        assert_eq!(rb.width(), 10);
        assert_eq!(rb.height(), 4);
        assert_eq!(rb.stride(), 10);
        assert_eq!(rb.format(), PixelFormatTag::Rgb32);
    }

    #[test]
    fn test_row_accessor_padded_stride() {
        // 3 wide, 2 high, 5 pixels per stored row
        let data: Vec<u8> = vec![1, 2, 3, 99, 99, 4, 5, 6];
        let rb = RowAccessor::new(&data, 3, 2, 5).unwrap();
        assert_eq!(rb.row_slice(0), &[1, 2, 3]);
        assert_eq!(rb.row_slice(1), &[4, 5, 6]);
        assert_eq!(rb.get_pixel(2, 1), 6);
    }

    #[test]
    fn test_row_accessor_negative_stride() {
        let mut data = vec![0u16; 30];
        data[0..10].fill(0);
        data[10..20].fill(1);
        data[20..30].fill(2);

        let rb = RowAccessor::new(&data, 10, 3, -10).unwrap();

        // With negative stride, row 0 is the LAST stored row
        assert_eq!(rb.row_slice(0)[0], 2);
        assert_eq!(rb.row_slice(1)[0], 1);
        assert_eq!(rb.row_slice(2)[0], 0);
        assert_eq!(rb.format(), PixelFormatTag::Gray16);
    }

    #[test]
    fn test_short_slice_rejected() {
        let data = vec![0u8; 29];
        let err = RowAccessor::new(&data, 10, 3, 10).unwrap_err();
        assert!(matches!(err, FillError::InvalidLayout(_)));
    }

    #[test]
    fn test_stride_shorter_than_width_rejected() {
        let data = vec![0u8; 100];
        assert!(RowAccessor::new(&data, 10, 3, 8).is_err());
        assert!(RowAccessor::new(&data, 10, 3, -8).is_err());
    }

    #[test]
    fn test_unaddressable_dimensions_rejected() {
        let data: Vec<u8> = Vec::new();
        let err = RowAccessor::packed(&data, i32::MAX as u32 + 1, 1).unwrap_err();
        assert!(err.to_string().contains("exceeds i32 coordinates"));
        let err = RowAccessor::new(&data, 1, u32::MAX, 1).unwrap_err();
        assert!(err.to_string().contains("exceeds i32 coordinates"));
        let mut data: Vec<u16> = Vec::new();
        assert!(RowAccessorMut::packed(&mut data, u32::MAX, 1).is_err());
    }

    #[test]
    fn test_empty_buffer_is_valid() {
        let data: Vec<u8> = Vec::new();
        let rb = RowAccessor::new(&data, 0, 0, 0).unwrap();
        assert_eq!(rb.height(), 0);
    }

    #[test]
    #[should_panic(expected = "out of bounds")]
    fn test_row_out_of_bounds_panics() {
        let data = vec![0u8; 4];
        let rb = RowAccessor::packed(&data, 2, 2).unwrap();
        rb.row_slice(2);
    }

    #[test]
    fn test_row_accessor_mut_copy_hline() {
        let mut data = vec![0u8; 20];
        let mut rb = RowAccessorMut::packed(&mut data, 5, 4).unwrap();
        rb.copy_hline(1, 2, 3, 7);
        assert_eq!(rb.row_slice(2), &[0, 7, 7, 7, 0]);
        assert_eq!(rb.row_slice(1), &[0; 5]);
        assert_eq!(data[11..14], [7, 7, 7]);
    }

    #[test]
    fn test_row_accessor_mut_negative_stride_write() {
        let mut data = vec![0u32; 6];
        let mut rb = RowAccessorMut::new(&mut data, 3, 2, -3).unwrap();
        rb.row_slice_mut(0)[0] = 0xFF00_00FF;
        assert_eq!(rb.as_accessor().get_pixel(0, 0), 0xFF00_00FF);
        assert_eq!(data[3], 0xFF00_00FF);
    }

    #[test]
    fn test_row_accessor_mut_clear() {
        let mut data = vec![0u8; 12];
        let mut rb = RowAccessorMut::new(&mut data, 3, 3, 4).unwrap();
        rb.clear(0xAA);
        // Padding column is untouched
        assert_eq!(data, [0xAA, 0xAA, 0xAA, 0, 0xAA, 0xAA, 0xAA, 0, 0xAA, 0xAA, 0xAA, 0]);
    }

    #[test]
    fn test_generic_buffer() {
        let gb = GenericBuffer::new(4, 3, |x, y| (x + y * 10) as u32);
        assert_eq!(gb.format(), PixelFormatTag::Generic);
        assert!(gb.row(0).is_none());
        assert_eq!(gb.get_pixel(3, 2), 23);
    }
}
