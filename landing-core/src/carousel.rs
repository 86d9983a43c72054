//! Infinite carousel: a ring of slides padded with boundary clones, and the
//! coordinator that keeps the centred slide real after every settle.

pub mod coordinator;
pub mod ring;
pub mod surface;

pub use coordinator::{CarouselOptions, EdgeButtons, ScrollCoordinator, SlideState};
pub use ring::{RingIndex, Slide, SlideRing};
pub use surface::{ScrollBehavior, ScrollSurface, SlideExtent, TrackLayout};
