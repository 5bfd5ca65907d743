//! Scanline flood fill.
//!
//! Non-recursive fill of the 4-connected region of pixels equal to the seed
//! pixel's color. The region is discovered as maximal horizontal runs; each
//! run is reported once through a caller callback and recorded as a
//! [`Segment`] in a per-call segment arena.
//!
//! The arena reserves one head slot per row (index == row). A row holding
//! several disjoint runs chains the extra ones through overflow slots past
//! the heads. Every recorded segment carries "row above / row below still to
//! check" flags, and the engine sweeps the arena until no flag is left.
//!
//! Reads always go through a [`PixelAccessor`] over the buffer as passed in;
//! the callback is the only place the caller's pixels may change, and the
//! engine never looks at those changes.

use crate::error::FillResult;
use crate::pixel_access::{addressable_size, emit_run, PixelAccessor, PixelBuffer};

// ============================================================================
// Segment flags
// ============================================================================

/// The slot holds a discovered run.
pub const SEGMENT_IN_USE: u8 = 1;
/// The row above has not been checked under this run yet.
pub const SEGMENT_NEEDS_ABOVE: u8 = 2;
/// The row below has not been checked under this run yet.
pub const SEGMENT_NEEDS_BELOW: u8 = 4;

/// `next` value terminating a row chain. Index 0 is a row head, never an
/// overflow slot, so it cannot be a real link.
const NO_LINK: usize = 0;

// ============================================================================
// Segment
// ============================================================================

/// A maximal horizontal run already discovered on `row`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Segment {
    pub row: i32,
    /// Inclusive left bound.
    pub left: i32,
    /// Inclusive right bound.
    pub right: i32,
    pub flags: u8,
    /// Arena index of the next run on the same row, or 0.
    pub next: usize,
}

impl Segment {
    /// An empty row head. The inverted bounds contain no column.
    fn unused(row: i32) -> Self {
        Self {
            row,
            left: i32::MAX,
            right: i32::MIN,
            flags: 0,
            next: NO_LINK,
        }
    }

    #[inline]
    pub fn is_in_use(&self) -> bool {
        self.flags & SEGMENT_IN_USE != 0
    }

    #[inline]
    pub fn contains(&self, x: i32) -> bool {
        x >= self.left && x <= self.right
    }
}

// ============================================================================
// SegmentArena
// ============================================================================

/// Index-addressed segment storage owned by one fill.
///
/// Slots `0..rows` are row heads; later slots are overflow runs linked from
/// a head through `next`. Growth may move the storage, so callers hold
/// indices, never references, across a push.
#[derive(Debug)]
pub(crate) struct SegmentArena {
    segments: Vec<Segment>,
    rows: usize,
}

impl SegmentArena {
    /// Arena with `rows` unused head slots and room for `overflow` more.
    pub(crate) fn new(rows: u32, overflow: usize) -> FillResult<Self> {
        let rows = rows as usize;
        let mut segments = Vec::new();
        segments.try_reserve_exact(rows.saturating_add(overflow))?;
        segments.extend((0..rows).map(|y| Segment::unused(y as i32)));
        Ok(Self { segments, rows })
    }

    /// Number of allocated slots, heads included.
    pub(crate) fn len(&self) -> usize {
        self.segments.len()
    }

    /// Number of reserved row-head slots.
    pub(crate) fn rows(&self) -> usize {
        self.rows
    }

    pub(crate) fn get(&self, index: usize) -> &Segment {
        &self.segments[index]
    }

    #[cfg(test)]
    fn segments(&self) -> &[Segment] {
        &self.segments
    }

    /// Runs recorded for row `y`, in chain order.
    #[cfg(test)]
    fn row_chain(&self, y: i32) -> RowChain<'_> {
        let head = &self.segments[y as usize];
        RowChain {
            arena: self,
            cur: if head.is_in_use() {
                Some(y as usize)
            } else {
                None
            },
        }
    }

    /// Right bound of the recorded run on row `y` that contains `x`.
    pub(crate) fn covering(&self, y: i32, x: i32) -> Option<i32> {
        let mut c = y as usize;
        loop {
            let seg = &self.segments[c];
            if seg.contains(x) {
                return Some(seg.right);
            }
            if seg.next == NO_LINK {
                return None;
            }
            c = seg.next;
        }
    }

    /// Record the run `[left, right]` on `row`, returning its slot.
    ///
    /// Occupies the row head when it is free, otherwise appends an overflow
    /// slot to the end of the row's chain.
    pub(crate) fn push_run(&mut self, row: i32, left: i32, right: i32, flags: u8) -> FillResult<usize> {
        let mut c = row as usize;
        if self.segments[c].is_in_use() {
            while self.segments[c].next != NO_LINK {
                c = self.segments[c].next;
            }
            self.segments.try_reserve(1)?;
            let slot = self.segments.len();
            self.segments.push(Segment::unused(row));
            self.segments[c].next = slot;
            c = slot;
        }
        let seg = &mut self.segments[c];
        seg.left = left;
        seg.right = right;
        seg.flags = SEGMENT_IN_USE | flags;
        seg.next = NO_LINK;
        Ok(c)
    }

    fn clear_flag(&mut self, index: usize, flag: u8) {
        self.segments[index].flags &= !flag;
    }
}

/// Iterator over the runs of one row.
#[cfg(test)]
struct RowChain<'a> {
    arena: &'a SegmentArena,
    cur: Option<usize>,
}

#[cfg(test)]
impl<'a> Iterator for RowChain<'a> {
    type Item = &'a Segment;

    fn next(&mut self) -> Option<&'a Segment> {
        let seg = self.arena.get(self.cur?);
        self.cur = match seg.next {
            NO_LINK => None,
            n => Some(n),
        };
        Some(seg)
    }
}

// ============================================================================
// Options and statistics
// ============================================================================

/// Order in which the fixed-point sweep visits the arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SweepOrder {
    /// After upward work is found from a row head, step the cursor back so
    /// the freshly filled rows above are handled in the same sweep.
    #[default]
    Backtrack,
    /// Strictly increasing indices every sweep.
    Linear,
}

/// Tuning knobs for [`flood_fill_with`]. The filled region does not depend
/// on them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct FillOptions {
    pub sweep: SweepOrder,
    /// Overflow slots reserved up front, beyond the row heads.
    pub overflow_capacity: usize,
}

impl FillOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn sweep(mut self, sweep: SweepOrder) -> Self {
        self.sweep = sweep;
        self
    }

    pub fn overflow_capacity(mut self, overflow_capacity: usize) -> Self {
        self.overflow_capacity = overflow_capacity;
        self
    }
}

/// Counters from one fill.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct FillStats {
    /// Runs reported to the callback.
    pub runs: usize,
    /// Arena slots past the row heads.
    pub overflow_segments: usize,
    /// Full passes over the arena, the final no-change pass included.
    pub sweeps: usize,
}

// ============================================================================
// Engine
// ============================================================================

struct Flooder<'a, 'f, B: ?Sized, F> {
    pixels: PixelAccessor<'a, B>,
    arena: SegmentArena,
    src_color: u32,
    on_run: &'f mut F,
    runs: usize,
}

impl<B, F> Flooder<'_, '_, B, F>
where
    B: PixelBuffer + ?Sized,
    F: FnMut(i32, i32, i32),
{
    /// Fill the run through (x, y) and record it.
    ///
    /// Returns the next column worth probing and whether a run was recorded.
    /// `right + 1` is known not to match, so the next probe is `right + 2`.
    fn flood_run(&mut self, x: i32, y: i32) -> FillResult<(i32, bool)> {
        let Some((left, right)) = self.pixels.scan_run(x, y, self.src_color) else {
            return Ok((x + 1, false));
        };

        emit_run(left, right, y, &mut *self.on_run);
        self.runs += 1;

        let mut flags = 0;
        if y > 0 {
            flags |= SEGMENT_NEEDS_ABOVE;
        }
        if y + 1 < self.pixels.height() {
            flags |= SEGMENT_NEEDS_BELOW;
        }
        self.arena.push_run(y, left, right, flags)?;
        Ok((right + 2, true))
    }

    /// Look for unfilled runs on row `y` within `[left, right]`.
    fn check_row(&mut self, y: i32, mut left: i32, right: i32) -> FillResult<bool> {
        let mut found = false;
        while left <= right {
            match self.arena.covering(y, left) {
                Some(covered_right) => left = covered_right + 2,
                None => {
                    let (next, recorded) = self.flood_run(left, y)?;
                    found |= recorded;
                    left = next;
                }
            }
        }
        Ok(found)
    }

    /// Sweep the arena until a full pass finds no pending work.
    fn sweep(&mut self, order: SweepOrder) -> FillResult<usize> {
        let heads = self.arena.rows();
        let mut sweeps = 0;
        loop {
            sweeps += 1;
            let mut done = true;
            let mut c = 0;
            // The arena may grow while this loop runs; new slots are visited too.
            while c < self.arena.len() {
                let seg = *self.arena.get(c);
                let mut step_back = false;

                if seg.flags & SEGMENT_NEEDS_BELOW != 0 {
                    self.arena.clear_flag(c, SEGMENT_NEEDS_BELOW);
                    if self.check_row(seg.row + 1, seg.left, seg.right)? {
                        done = false;
                    }
                }

                if seg.flags & SEGMENT_NEEDS_ABOVE != 0 {
                    self.arena.clear_flag(c, SEGMENT_NEEDS_ABOVE);
                    if self.check_row(seg.row - 1, seg.left, seg.right)? {
                        done = false;
                        step_back = order == SweepOrder::Backtrack && c > 0 && c < heads;
                    }
                }

                c = if step_back { c - 1 } else { c + 1 };
            }
            if done {
                return Ok(sweeps);
            }
        }
    }
}

/// Fill the region around (`seed_x`, `seed_y`) with default options.
///
/// `on_run(x0, x1, y)` is called once per discovered run with inclusive
/// bounds. The seed row is reported first; no other ordering is promised.
/// A seed outside the buffer reports nothing and returns `Ok`.
///
/// # Errors
/// [`FillError::InvalidLayout`](crate::error::FillError::InvalidLayout)
/// when the width or height does not fit in `i32` coordinates,
/// [`FillError::UnsupportedFormat`](crate::error::FillError::UnsupportedFormat)
/// when the buffer's rows disagree with its format tag, and
/// [`FillError::Alloc`](crate::error::FillError::Alloc) when the segment
/// arena cannot grow. Runs already reported before an allocation failure
/// stay reported.
pub fn flood_fill<B, F>(buffer: &B, seed_x: i32, seed_y: i32, on_run: F) -> FillResult<()>
where
    B: PixelBuffer + ?Sized,
    F: FnMut(i32, i32, i32),
{
    flood_fill_with(buffer, seed_x, seed_y, &FillOptions::default(), on_run).map(|_| ())
}

/// [`flood_fill`] with explicit [`FillOptions`], returning counters.
#[tracing::instrument(level = "debug", skip(buffer, on_run))]
pub fn flood_fill_with<B, F>(
    buffer: &B,
    seed_x: i32,
    seed_y: i32,
    options: &FillOptions,
    mut on_run: F,
) -> FillResult<FillStats>
where
    B: PixelBuffer + ?Sized,
    F: FnMut(i32, i32, i32),
{
    let (width, height) = addressable_size(buffer.width(), buffer.height())?;
    if seed_x < 0 || seed_x >= width || seed_y < 0 || seed_y >= height {
        tracing::debug!(width, height, "seed outside buffer, nothing to fill");
        return Ok(FillStats::default());
    }

    let pixels = PixelAccessor::new(buffer)?;
    let src_color = pixels.sample_color(seed_x, seed_y);
    let arena = SegmentArena::new(buffer.height(), options.overflow_capacity)?;

    let mut flooder = Flooder {
        pixels,
        arena,
        src_color,
        on_run: &mut on_run,
        runs: 0,
    };
    flooder.flood_run(seed_x, seed_y)?;
    let sweeps = flooder.sweep(options.sweep)?;

    let stats = FillStats {
        runs: flooder.runs,
        overflow_segments: flooder.arena.len() - flooder.arena.rows(),
        sweeps,
    };
    tracing::debug!(
        src_color,
        runs = stats.runs,
        overflow = stats.overflow_segments,
        sweeps = stats.sweeps,
        "flood fill complete"
    );
    Ok(stats)
}

/// Run a fill and hand back its arena, for inspecting the recorded segments.
#[cfg(test)]
pub(crate) fn fill_arena<B: PixelBuffer + ?Sized>(
    buffer: &B,
    seed_x: i32,
    seed_y: i32,
    order: SweepOrder,
) -> SegmentArena {
    let pixels = PixelAccessor::new(buffer).unwrap();
    let src_color = pixels.sample_color(seed_x, seed_y);
    let mut sink = |_: i32, _: i32, _: i32| {};
    let mut flooder = Flooder {
        pixels,
        arena: SegmentArena::new(buffer.height(), 0).unwrap(),
        src_color,
        on_run: &mut sink,
        runs: 0,
    };
    flooder.flood_run(seed_x, seed_y).unwrap();
    flooder.sweep(order).unwrap();
    flooder.arena
}

// ============================================================================
// Tests
// ============================================================================
