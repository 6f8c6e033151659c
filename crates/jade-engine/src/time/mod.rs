//! Frame timing.
//!
//! One `FrameClock` per render loop; `tick()` once per iteration yields the
//! `FrameTime` handed to the current scene.

mod frame_clock;

pub use frame_clock::{FrameClock, FrameTime, FIRST_FRAME_DT};
