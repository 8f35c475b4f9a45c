//! Weighted fortune wheel.
//!
//! Each word gets a slice proportional to its weight. A spin picks a target
//! by weight, turns the wheel a whole number of revolutions plus the offset
//! that centres the target under the pointer, and then resolves the final
//! rotation back to a word.

pub mod items;
pub mod segments;
pub mod session;
pub mod spin;

pub use items::{WeightedItem, parse_items, parse_items_str};
pub use segments::{Segment, build_segments, normalize_angle};
pub use session::{FortuneWheel, RecordingWheelPresenter, WheelPresenter, WheelStatus};
pub use spin::{POINTER_ANGLE, SpinAnimation, SpinResolver, WheelConfig, ease_out_cubic};
