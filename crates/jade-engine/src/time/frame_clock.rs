use std::time::{Duration, Instant};

/// `dt` reported by the first tick, before there is a previous sample.
///
/// Negative so callers can tell "no delta yet" apart from a zero-length frame.
pub const FIRST_FRAME_DT: f32 = -1.0;

/// Frame timing snapshot.
#[derive(Debug, Copy, Clone)]
pub struct FrameTime {
    /// Seconds since the previous tick, or [`FIRST_FRAME_DT`] on the first one.
    pub dt: f32,

    /// Monotonic timestamp taken at the tick.
    pub now: Instant,

    /// Monotonic frame counter, starting at 0.
    pub frame_index: u64,
}

impl FrameTime {
    /// Whether a real delta is available (every tick but the first).
    #[inline]
    pub fn has_delta(&self) -> bool {
        self.dt >= 0.0
    }
}

/// Frame clock producing `FrameTime` snapshots.
///
/// The delta is the plain difference between consecutive monotonic samples.
/// Clamping is opt-in through [`FrameClock::with_clamps`].
#[derive(Debug, Clone, Default)]
pub struct FrameClock {
    last: Option<Instant>,
    frame_index: u64,
    clamps: Option<(Duration, Duration)>,
}

impl FrameClock {
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a clock whose non-first deltas are clamped to `[dt_min, dt_max]`.
    pub fn with_clamps(dt_min: Duration, dt_max: Duration) -> Self {
        debug_assert!(dt_min <= dt_max);
        Self {
            clamps: Some((dt_min, dt_max)),
            ..Self::default()
        }
    }

    /// Forgets the previous sample; the next tick reports [`FIRST_FRAME_DT`] again.
    pub fn reset(&mut self) {
        self.last = None;
    }

    /// Samples the monotonic clock and returns a new `FrameTime`.
    pub fn tick(&mut self) -> FrameTime {
        self.tick_at(Instant::now())
    }

    pub(crate) fn tick_at(&mut self, now: Instant) -> FrameTime {
        let dt = match self.last {
            None => FIRST_FRAME_DT,
            Some(last) => {
                let mut dt = now.saturating_duration_since(last);
                if let Some((lo, hi)) = self.clamps {
                    dt = dt.clamp(lo, hi);
                }
                dt.as_secs_f32()
            }
        };

        self.last = Some(now);

        let ft = FrameTime {
            dt,
            now,
            frame_index: self.frame_index,
        };

        self.frame_index = self.frame_index.wrapping_add(1);

        ft
    }
}
