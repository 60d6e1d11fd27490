//! Narrowphase data and logic module.

pub mod swept;

use crate::{body::Collidable, config::RECT_TOLERANCE, Fp, Vec2};

// ---------- Primitives ---------- //

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Circle {
    pub rad: Fp,
    pub pos: Vec2,
}
impl Circle {
    #[inline]
    pub fn new(rad: Fp, posx: Fp, posy: Fp) -> Circle {
        Circle { rad, pos: Vec2::new(posx, posy) }
    }
    #[inline]
    pub fn globalize(self, pos: Vec2, scale: Fp) -> Circle {
        Circle { pos: self.pos * scale + pos, rad: self.rad * scale }
    }

    #[inline]
    pub fn is_degenerate(&self) -> bool {
        self.rad <= 0.0
    }
    #[inline]
    pub fn is_finite(&self) -> bool {
        self.rad.is_finite() && self.pos.x.is_finite() && self.pos.y.is_finite()
    }
}

/// Axis-aligned rectangle, from its origin (minimum corner) and size.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Rect {
    pub pos: Vec2,
    pub size: Vec2,
}
impl Rect {
    #[inline]
    pub fn new(x: Fp, y: Fp, width: Fp, height: Fp) -> Rect {
        Rect { pos: Vec2::new(x, y), size: Vec2::new(width, height) }
    }

    #[inline]
    pub fn max(&self) -> Vec2 {
        self.pos + self.size
    }
    #[inline]
    pub fn translate(self, offset: Vec2) -> Rect {
        Rect { pos: self.pos + offset, size: self.size }
    }
    #[inline]
    pub fn globalize(self, pos: Vec2, scale: Fp) -> Rect {
        Rect { pos: self.pos * scale + pos, size: self.size * scale }
    }
    #[inline]
    pub fn broaden(&self, dir: Vec2) -> Rect {
        //! Returns the union of `self` and `self` translated by `dir`.
        Rect { pos: self.pos.min(self.pos + dir), size: self.size + dir.abs() }
    }

    #[inline]
    pub fn is_degenerate(&self) -> bool {
        self.size.x <= 0.0 || self.size.y <= 0.0
    }
    #[inline]
    pub fn is_finite(&self) -> bool {
        self.pos.x.is_finite() && self.pos.y.is_finite() && self.size.x.is_finite() && self.size.y.is_finite()
    }
}

// ---------- Shape-Shape intersection tests ---------- //

#[inline]
fn rect_rect_test(r1: &Rect, r2: &Rect, tolerance: Fp) -> bool {
    if r1.is_degenerate() || r2.is_degenerate() {
        return false;
    }
    let (max1, max2) = (r1.max(), r2.max());
    r1.pos.x < max2.x + tolerance
        && max1.x + tolerance > r2.pos.x
        && r1.pos.y < max2.y + tolerance
        && max1.y + tolerance > r2.pos.y
}
#[inline]
fn rect_circle_test(rect: &Rect, circle: &Circle) -> bool {
    if rect.is_degenerate() || circle.is_degenerate() {
        return false;
    }
    // closest point of the rect to the circle's center
    let closest = circle.pos.max(rect.pos).min(rect.max());
    (circle.pos - closest).length_squared() <= circle.rad * circle.rad
}
#[inline]
fn circle_circle_test(c1: &Circle, c2: &Circle) -> bool {
    if c1.is_degenerate() || c2.is_degenerate() {
        return false;
    }
    let srad = c1.rad + c2.rad;
    (c1.pos - c2.pos).length_squared() <= srad * srad
}

// ---------- Intersect ---------- //

pub trait Intersect {
    /// Rectangle intersection. `tolerance` widens rectangle-rectangle tests only.
    fn rect_test(&self, rect: &Rect, tolerance: Fp) -> bool;
    /// Circle intersection.
    fn circle_test(&self, circle: &Circle) -> bool;
}

impl Intersect for Circle {
    #[inline]
    fn rect_test(&self, rect: &Rect, _: Fp) -> bool {
        rect_circle_test(rect, self)
    }
    #[inline]
    fn circle_test(&self, circle: &Circle) -> bool {
        circle_circle_test(self, circle)
    }
}
impl Intersect for Rect {
    #[inline]
    fn rect_test(&self, rect: &Rect, tolerance: Fp) -> bool {
        rect_rect_test(self, rect, tolerance)
    }
    #[inline]
    fn circle_test(&self, circle: &Circle) -> bool {
        rect_circle_test(self, circle)
    }
}

// ---------- Shape ---------- //

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Shape {
    Rect(Rect),
    Circle(Circle),
}
impl Shape {
    #[inline]
    pub fn globalize(&self, pos: Vec2, scale: Fp) -> Shape {
        //! Moves a local-space shape into world space: `local * scale + pos`.
        match self {
            Shape::Rect(r) => Shape::Rect(r.globalize(pos, scale)),
            Shape::Circle(c) => Shape::Circle(c.globalize(pos, scale)),
        }
    }

    pub fn is_finite(&self) -> bool {
        match self {
            Shape::Rect(r) => r.is_finite(),
            Shape::Circle(c) => c.is_finite(),
        }
    }

    pub fn shape_test(&self, other: &Shape, tolerance: Fp) -> bool {
        match other {
            Shape::Rect(r) => self.rect_test(r, tolerance),
            Shape::Circle(c) => self.circle_test(c),
        }
    }
}
impl Intersect for Shape {
    fn rect_test(&self, rect: &Rect, tolerance: Fp) -> bool {
        match self {
            Shape::Rect(r) => r.rect_test(rect, tolerance),
            Shape::Circle(c) => c.rect_test(rect, tolerance),
        }
    }
    fn circle_test(&self, circle: &Circle) -> bool {
        match self {
            Shape::Rect(r) => r.circle_test(circle),
            Shape::Circle(c) => c.circle_test(circle),
        }
    }
}

impl From<Circle> for Shape {
    fn from(circle: Circle) -> Self {
        Shape::Circle(circle)
    }
}
impl From<Rect> for Shape {
    fn from(rect: Rect) -> Self {
        Shape::Rect(rect)
    }
}

// ---------- Collider ---------- //

/// A shape plus the tag game logic uses to tell an entity's colliders apart.
///
/// Tags need not be unique within an entity.
#[derive(Clone, Debug, PartialEq)]
pub struct Collider {
    pub shape: Shape,
    pub tag: String,
}
impl Collider {
    pub fn new(shape: impl Into<Shape>, tag: impl Into<String>) -> Collider {
        Collider { shape: shape.into(), tag: tag.into() }
    }
    pub fn rect(x: Fp, y: Fp, width: Fp, height: Fp, tag: impl Into<String>) -> Collider {
        Collider::new(Rect::new(x, y, width, height), tag)
    }
    pub fn circle(rad: Fp, posx: Fp, posy: Fp, tag: impl Into<String>) -> Collider {
        Collider::new(Circle::new(rad, posx, posy), tag)
    }

    #[inline]
    pub fn globalize(&self, pos: Vec2, scale: Fp) -> Collider {
        Collider { shape: self.shape.globalize(pos, scale), tag: self.tag.clone() }
    }
}

/// Discrete, symmetric overlap test with the default rectangle tolerance.
#[inline]
pub fn intersects(a: &Shape, b: &Shape) -> bool {
    a.shape_test(b, RECT_TOLERANCE)
}

/// Moves one of `entity`'s local colliders into world space, e.g. for drawing hitboxes.
#[inline]
pub fn globalize<C: Collidable + ?Sized>(collider: &Collider, entity: &C) -> Collider {
    collider.globalize(entity.position(), entity.scale())
}
