//! Layout, hit-testing and painting
//!
//! Layout is a pure function of the buffer, a [`TextMeasurer`] and a
//! [`LayoutConfig`]. The result is tagged with the buffer's layout generation
//! and thrown away as soon as an edit bumps it; there is no incremental
//! relayout.

pub mod engine;
pub mod geometry;
pub mod hit_test;
pub mod measurer;
pub mod paint;

pub use engine::{bullet_text, Bullet, ContainerLayout, DocumentLayout, LayoutConfig, LineLayout};
pub use geometry::{Point, Rect, Size};
pub use hit_test::{HitTestFlags, HitTestResult};
pub use measurer::{FixedPitchMeasurer, TextMeasurer, DEFAULT_FONT_SIZE, PLACEHOLDER_IMAGE};
pub use paint::Painter;
