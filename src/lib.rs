//! 2-D point-light illumination with cast shadows and soft penumbrae.
//!
//! * [`math`]     – vectors, bounds and the circle tangent solver.
//! * [`world`]    – obstacles (discs, polygons, lines, rectangles) and lights.
//! * [`renderer`] – the [`renderer::Surface`] seam plus a software canvas.
//! * [`engine`]   – the two compositors: per-light [`engine::Lighting`] and
//!   the multi-light [`engine::DarkMask`].
//!
//! Everything is single-threaded: shared scene objects are handed around as
//! [`Shared`] (`Rc<RefCell<_>>`) and mutated by the owning update loop
//! between two `compute` calls.

use std::{cell::RefCell, rc::Rc};

pub mod color;
pub mod engine;
pub mod math;
pub mod renderer;
pub mod world;

/// Single-threaded shared, mutable handle to a scene object.
pub type Shared<T> = Rc<RefCell<T>>;

/// Wrap `value` into a [`Shared`] handle.
#[inline]
pub fn shared<T>(value: T) -> Shared<T> {
    Rc::new(RefCell::new(value))
}
