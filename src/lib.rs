//! Tick-based 2D collision detection for small simulations.
//!
//! Entities implement [`Collidable`] and are registered with a [`CollisionManager`].
//! Once per tick, [`CollisionManager::detect`] tests every pair of registered entities,
//! shape against shape, and turns the overlaps it finds into `on_enter`, `during_collision`
//! and `on_exit` notifications by comparing against the previous tick's contacts.
//!
//! Rectangles moving fast enough to skip over a target between two ticks are caught by
//! a swept test, see [`narrow::swept`].

pub mod body;
pub mod broad;
pub mod config;
pub mod contact;
pub mod error;
pub mod narrow;

#[cfg(not(feature = "f64"))]
pub type Fp = f32;
#[cfg(not(feature = "f64"))]
pub type Vec2 = glam::Vec2;

#[cfg(feature = "f64")]
pub type Fp = f64;
#[cfg(feature = "f64")]
pub type Vec2 = glam::DVec2;

pub use body::{Body, Collidable, Handle, Peer};
pub use broad::manager::{Commands, CollisionManager, Report};
pub use config::Config;
pub use contact::{Contact, EntityId};
pub use error::{Error, Result};
pub use narrow::{globalize, intersects, Circle, Collider, Rect, Shape};
