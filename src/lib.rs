//! # scanfill
//!
//! Non-recursive scanline flood fill over 2D pixel buffers.
//!
//! Given a seed pixel, the engine discovers the 4-connected region of pixels
//! whose raw value equals the seed's, one maximal horizontal run at a time,
//! and reports every run exactly once through a callback. What happens to the
//! pixels (painting, building a selection, previewing) is up to the caller.
//!
//! - Exact integer color matching, no tolerance
//! - Fast row-slice reads for 32-bit RGB, 16-bit gray and 8-bit indexed
//!   buffers; a closure-backed path for anything else
//! - Top-down and bottom-up (negative stride) storage
//! - No recursion and no global state: each call owns its segment arena, so
//!   independent fills can run on separate threads
//!
//! ## Architecture
//!
//! 1. **Rendering buffer** — typed row views over caller memory
//! 2. **Pixel access** — format tag dispatch, selected once per fill
//! 3. **Flood fill** — segment arena and the fixed-point sweep
//! 4. **Region** — span lists, selection masks and bucket fills
//!
//! ```
//! use scanfill::{flood_fill, RowAccessor};
//!
//! let pixels: Vec<u8> = vec![
//!     0, 0, 1,
//!     1, 0, 1,
//!     0, 0, 1,
//! ];
//! let rb = RowAccessor::packed(&pixels, 3, 3).unwrap();
//! let mut area = 0;
//! flood_fill(&rb, 1, 1, |x0, x1, _y| area += x1 - x0 + 1).unwrap();
//! assert_eq!(area, 5);
//! ```

pub mod error;
pub mod flood_fill;
pub mod pixel_access;
pub mod region;
pub mod rendering_buffer;

pub use error::{FillError, FillResult};
pub use flood_fill::{flood_fill, flood_fill_with, FillOptions, FillStats, SweepOrder};
pub use pixel_access::{PixelBuffer, PixelFormatTag, PixelRow};
pub use region::{collect_spans, fill_region, region_mask, Span};
pub use rendering_buffer::{GenericBuffer, Pixel, RowAccessor, RowAccessorMut};
