//! Region helpers built on [`flood_fill`].
//!
//! The engine only reports runs. These helpers turn the runs into the
//! things an editor usually wants: a span list, a selection mask, or a
//! bucket fill that paints the region with a new value.

use crate::error::FillResult;
use crate::flood_fill::flood_fill;
use crate::pixel_access::PixelBuffer;
use crate::rendering_buffer::{Pixel, RowAccessorMut};

/// One reported run, inclusive on both ends.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Span {
    pub y: i32,
    pub x0: i32,
    pub x1: i32,
}

impl Span {
    pub fn new(x0: i32, x1: i32, y: i32) -> Self {
        Self { y, x0, x1 }
    }

    /// Number of pixels covered.
    pub fn pixel_count(&self) -> u32 {
        (self.x1 - self.x0 + 1) as u32
    }
}

/// All runs of the region around (x, y), in discovery order.
pub fn collect_spans<B>(buffer: &B, x: i32, y: i32) -> FillResult<Vec<Span>>
where
    B: PixelBuffer + ?Sized,
{
    let mut spans = Vec::new();
    flood_fill(buffer, x, y, |x0, x1, y| spans.push(Span::new(x0, x1, y)))?;
    Ok(spans)
}

/// Selection mask of the region around (x, y).
///
/// Row-major, `width * height` bytes: 255 inside the region, 0 outside.
pub fn region_mask<B>(buffer: &B, x: i32, y: i32) -> FillResult<Vec<u8>>
where
    B: PixelBuffer + ?Sized,
{
    let width = buffer.width() as usize;
    let mut mask = vec![0u8; width * buffer.height() as usize];
    flood_fill(buffer, x, y, |x0, x1, y| {
        let row = y as usize * width;
        mask[row + x0 as usize..=row + x1 as usize].fill(255);
    })?;
    Ok(mask)
}

/// Paint the region around (x, y) with `value`. Returns the pixel count.
///
/// The whole region is discovered before the first write, so the scan
/// only ever sees the original colors.
pub fn fill_region<T: Pixel>(
    rbuf: &mut RowAccessorMut<'_, T>,
    x: i32,
    y: i32,
    value: T,
) -> FillResult<usize> {
    let spans = collect_spans(&*rbuf, x, y)?;
    let mut painted = 0usize;
    for s in &spans {
        rbuf.copy_hline(s.x0, s.y, s.pixel_count(), value);
        painted += s.pixel_count() as usize;
    }
    tracing::debug!(spans = spans.len(), painted, "region painted");
    Ok(painted)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rendering_buffer::RowAccessor;

    #[test]
    fn test_span_pixel_count() {
        assert_eq!(Span::new(3, 3, 0).pixel_count(), 1);
        assert_eq!(Span::new(0, 9, 4).pixel_count(), 10);
    }

    #[test]
    fn test_collect_spans_sorted() {
        let data: Vec<u8> = vec![
            0, 0, 1, 0, //
            0, 1, 1, 0, //
            0, 0, 0, 0, //
        ];
        let rb = RowAccessor::packed(&data, 4, 3).unwrap();
        let mut spans = collect_spans(&rb, 0, 0).unwrap();
        spans.sort();
        assert_eq!(
            spans,
            vec![
                Span::new(0, 1, 0),
                Span::new(3, 3, 0),
                Span::new(0, 0, 1),
                Span::new(3, 3, 1),
                Span::new(0, 3, 2),
            ]
        );
    }

    #[test]
    fn test_region_mask() {
        let data: Vec<u16> = vec![
            7, 7, 2, //
            2, 7, 2, //
            7, 2, 7, //
        ];
        let rb = RowAccessor::packed(&data, 3, 3).unwrap();
        let mask = region_mask(&rb, 0, 0).unwrap();
        assert_eq!(mask, vec![255, 255, 0, 0, 255, 0, 0, 0, 0]);
    }

    #[test]
    fn test_region_mask_out_of_bounds_is_empty() {
        let data = vec![1u8; 6];
        let rb = RowAccessor::packed(&data, 3, 2).unwrap();
        assert_eq!(region_mask(&rb, 5, 5).unwrap(), vec![0; 6]);
    }

    #[test]
    fn test_fill_region_paints_only_region() {
        let mut data: Vec<u32> = vec![
            1, 1, 9, 1, //
            1, 9, 9, 1, //
            9, 1, 1, 1, //
        ];
        let mut rb = RowAccessorMut::packed(&mut data, 4, 3).unwrap();
        let painted = fill_region(&mut rb, 3, 0, 5).unwrap();
        assert_eq!(painted, 5);
        assert_eq!(
            data,
            vec![
                1, 1, 9, 5, //
                1, 9, 9, 5, //
                9, 5, 5, 5, //
            ]
        );
    }

    #[test]
    fn test_fill_region_same_color_is_stable() {
        let mut data = vec![4u8; 9];
        let mut rb = RowAccessorMut::packed(&mut data, 3, 3).unwrap();
        assert_eq!(fill_region(&mut rb, 1, 1, 4).unwrap(), 9);
        assert_eq!(data, vec![4u8; 9]);
    }

    #[test]
    fn test_fill_region_bottom_up() {
        // Stored bottom-up: the first stored row is y = 1.
        let mut data: Vec<u8> = vec![
            3, 3, 3, //
            0, 3, 0, //
        ];
        let mut rb = RowAccessorMut::new(&mut data, 3, 2, -3).unwrap();
        assert_eq!(rb.as_accessor().get_pixel(0, 0), 0);
        assert_eq!(fill_region(&mut rb, 1, 0, 8).unwrap(), 4);
        assert_eq!(data, vec![8, 8, 8, 0, 8, 0]);
    }
}
