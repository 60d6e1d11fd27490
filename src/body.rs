use crate::{broad::manager::Commands, narrow::Collider, EntityId, Fp, Vec2};
use std::{cell::RefCell, fmt, rc::Rc};

/// Shared handle through which a [`CollisionManager`](crate::CollisionManager) reaches an entity.
pub type Handle = Rc<RefCell<dyn Collidable>>;

/// Anything that can be registered for collision detection.
///
/// Colliders are given in local space and moved into world space every tick as
/// `local * scale() + position()`. Only entities reporting a velocity take part in
/// swept detection. The notification hooks default to no-ops.
pub trait Collidable {
    fn position(&self) -> Vec2;
    /// Uniform scale applied to every collider.
    fn scale(&self) -> Fp {
        1.0
    }
    /// Local-space colliders. Must not be empty.
    fn colliders(&self) -> &[Collider];
    /// Velocity in units per unit of `delta`.
    fn velocity(&self) -> Option<Vec2> {
        None
    }

    /// One of `other`'s colliders, tagged `other_tag`, started touching this entity.
    fn on_enter(&mut self, _other: Peer<'_>, _other_tag: &str, _commands: &mut Commands) {}
    /// One of `other`'s colliders, tagged `other_tag`, stopped touching this entity.
    fn on_exit(&mut self, _other: Peer<'_>, _other_tag: &str, _commands: &mut Commands) {}
    /// Called once per tick for every entity this one is touching.
    fn during_collision(&mut self, _other: Peer<'_>, _delta: Fp, _commands: &mut Commands) {}
}

/// The other party of a contact, as seen from inside a notification.
#[derive(Clone, Copy)]
pub struct Peer<'a> {
    pub id: EntityId,
    pub entity: &'a dyn Collidable,
}
impl fmt::Debug for Peer<'_> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_struct("Peer").field("id", &self.id).finish()
    }
}

/// A collidable without behaviour, e.g. level geometry.
#[derive(Debug, Clone)]
pub struct Body {
    /// Position
    pub pos: Vec2,
    /// Uniform scale
    pub scale: Fp,
    /// Velocity, if the body is swept
    pub vel: Option<Vec2>,
    /// Compositing colliders
    pub colliders: Vec<Collider>,
}
impl Body {
    pub fn new(colliders: Vec<Collider>, pos: Vec2) -> Body {
        Body { pos, scale: 1.0, vel: None, colliders }
    }
    pub fn with_velocity(mut self, vel: Vec2) -> Body {
        self.vel = Some(vel);
        self
    }
    pub fn with_scale(mut self, scale: Fp) -> Body {
        self.scale = scale;
        self
    }

    pub fn translate(&mut self, offset: Vec2) {
        //! Teleports the body.
        self.pos += offset;
    }

    pub fn into_handle(self) -> Handle {
        Rc::new(RefCell::new(self))
    }
}
impl Collidable for Body {
    #[inline]
    fn position(&self) -> Vec2 {
        self.pos
    }
    #[inline]
    fn scale(&self) -> Fp {
        self.scale
    }
    #[inline]
    fn colliders(&self) -> &[Collider] {
        &self.colliders
    }
    #[inline]
    fn velocity(&self) -> Option<Vec2> {
        self.vel
    }
}
