//! Broadphase data and logic module.
//!
//! Every pair of entities is visited once, in registration order. The scan is O(n²) in
//! the number of entities; a sweep-and-prune pass could replace `scan` without changing
//! what reaches the narrowphase or how contacts are diffed.

pub mod manager;

use crate::{
    body::Collidable,
    config::Config,
    contact::{Contact, ContactSet},
    error::{Error, Result},
    narrow::{globalize, swept, Collider, Intersect, Shape},
    EntityId, Fp, Vec2,
};

/// An entity's colliders moved into world space, captured once per pass.
#[derive(Debug, Clone)]
pub struct WorldBody {
    pub id: EntityId,
    pub colliders: Vec<Collider>,
    pub vel: Option<Vec2>,
}
impl WorldBody {
    pub fn capture<C: Collidable + ?Sized>(id: EntityId, entity: &C) -> Result<WorldBody> {
        //! Globalizes `entity`'s colliders, failing on geometry no test could make sense of.
        let locals = entity.colliders();
        if locals.is_empty() {
            return Err(Error::NoColliders(id));
        }

        let mut colliders = Vec::with_capacity(locals.len());
        for local in locals {
            if local.tag.is_empty() {
                return Err(Error::EmptyTag(id));
            }
            let world = globalize(local, entity);
            if !world.shape.is_finite() {
                return Err(Error::NonFinite { entity: id, tag: world.tag });
            }
            colliders.push(world);
        }

        let vel = entity.velocity();
        if let Some(v) = vel {
            if !v.x.is_finite() || !v.y.is_finite() {
                return Err(Error::NonFiniteVelocity(id));
            }
        }
        Ok(WorldBody { id, colliders, vel })
    }
}

/// How a pair of colliders was found to overlap.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Hit {
    /// Overlapping as they stand.
    Discrete,
    /// Only overlapping part-way through the step, from the contained time on.
    Swept(Fp),
}

pub fn collider_test(a: &Shape, vel_a: Option<Vec2>, b: &Shape, delta: Fp, config: &Config) -> Option<Hit> {
    //! Narrowphase dispatch for one world-space shape pair.
    //!
    //! Rectangle pairs are swept when `a` has a velocity. Only `a`'s motion is considered and
    //! `b` is treated as stationary, even if it moves as well.
    match (a, b, vel_a) {
        (Shape::Rect(ra), Shape::Rect(rb), Some(vel)) => {
            if ra.rect_test(rb, config.rect_tolerance) {
                Some(Hit::Discrete)
            } else {
                swept::sweep(ra, vel * delta, rb, config).map(Hit::Swept)
            }
        }
        _ => {
            if a.shape_test(b, config.rect_tolerance) {
                Some(Hit::Discrete)
            } else {
                None
            }
        }
    }
}

/// Tallies of one scan.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ScanStats {
    pub pairs_tested: usize,
    /// Index pairs into the scanned bodies with at least one contact, in scan order.
    pub touching: Vec<(usize, usize)>,
    pub swept_hits: usize,
}

pub fn scan(bodies: &[WorldBody], delta: Fp, config: &Config, contacts: &mut ContactSet) -> ScanStats {
    //! Tests every pair of `bodies` once, earlier body first, inserting each overlap into `contacts`.
    let mut stats = ScanStats::default();
    for (i, a) in bodies.iter().enumerate() {
        for (j, b) in bodies.iter().enumerate().skip(i + 1) {
            stats.pairs_tested += 1;

            let mut touching = false;
            for ca in a.colliders.iter() {
                for cb in b.colliders.iter() {
                    let hit = match collider_test(&ca.shape, a.vel, &cb.shape, delta, config) {
                        Some(hit) => hit,
                        None => continue,
                    };
                    if let Hit::Swept(t) = hit {
                        log::trace!("swept hit {}:{:?} -> {}:{:?} at t={}", a.id, ca.tag, b.id, cb.tag, t);
                        stats.swept_hits += 1;
                    }
                    contacts.insert(Contact::new(a.id, &ca.tag, b.id, &cb.tag));
                    touching = true;
                }
            }
            if touching {
                stats.touching.push((i, j));
            }
        }
    }
    stats
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{narrow::{Circle, Rect}, Body};

    fn world(id: u64, colliders: Vec<Collider>, vel: Option<Vec2>) -> WorldBody {
        WorldBody { id: EntityId(id), colliders, vel }
    }

    #[test]
    fn capture_globalizes() {
        let body = Body::new(vec![Collider::rect(1.0, 1.0, 2.0, 2.0, "a"), Collider::circle(1.0, 0.0, 0.0, "b")], Vec2::new(10.0, 0.0))
            .with_scale(2.0)
            .with_velocity(Vec2::new(1.0, 0.0));
        let wb = WorldBody::capture(EntityId(4), &body).unwrap();
        assert_eq!(wb.id, EntityId(4));
        assert_eq!(wb.vel, Some(Vec2::new(1.0, 0.0)));
        assert_eq!(wb.colliders[0].shape, Shape::Rect(Rect::new(12.0, 2.0, 4.0, 4.0)));
        assert_eq!(wb.colliders[1].shape, Shape::Circle(Circle::new(2.0, 10.0, 0.0)));
    }

    #[test]
    fn capture_rejects_contract_violations() {
        let empty = Body::new(vec![], Vec2::new(0.0, 0.0));
        assert_eq!(WorldBody::capture(EntityId(1), &empty).unwrap_err(), Error::NoColliders(EntityId(1)));

        let untagged = Body::new(vec![Collider::rect(0.0, 0.0, 1.0, 1.0, "")], Vec2::new(0.0, 0.0));
        assert_eq!(WorldBody::capture(EntityId(1), &untagged).unwrap_err(), Error::EmptyTag(EntityId(1)));

        let nan = Body::new(vec![Collider::rect(0.0, 0.0, 1.0, 1.0, "r")], Vec2::new(Fp::NAN, 0.0));
        assert_eq!(
            WorldBody::capture(EntityId(1), &nan).unwrap_err(),
            Error::NonFinite { entity: EntityId(1), tag: "r".to_owned() }
        );

        let fast = Body::new(vec![Collider::rect(0.0, 0.0, 1.0, 1.0, "r")], Vec2::new(0.0, 0.0)).with_velocity(Vec2::new(Fp::INFINITY, 0.0));
        assert_eq!(WorldBody::capture(EntityId(1), &fast).unwrap_err(), Error::NonFiniteVelocity(EntityId(1)));

        // degenerate geometry is fine
        let flat = Body::new(vec![Collider::rect(0.0, 0.0, 0.0, 1.0, "r")], Vec2::new(0.0, 0.0));
        assert!(WorldBody::capture(EntityId(1), &flat).is_ok());
    }

    #[test]
    fn swept_only_for_moving_rect_pairs() {
        let config = Config::default();
        let mover: Shape = Rect::new(0.0, 0.0, 10.0, 10.0).into();
        let target: Shape = Rect::new(20.0, 0.0, 10.0, 10.0).into();
        let vel = Some(Vec2::new(50.0, 0.0));

        assert!(matches!(collider_test(&mover, vel, &target, 1.0, &config), Some(Hit::Swept(_))));
        assert_eq!(collider_test(&mover, None, &target, 1.0, &config), None);
        // `b`'s velocity is never consulted
        assert_eq!(collider_test(&target, None, &mover, 1.0, &config), None);
        // delta scales the displacement
        assert_eq!(collider_test(&mover, vel, &target, 0.1, &config), None);

        let ball: Shape = Circle::new(5.0, 5.0, 5.0).into();
        assert_eq!(collider_test(&ball, vel, &target, 1.0, &config), None);

        let touching: Shape = Rect::new(10.0, 0.0, 10.0, 10.0).into();
        assert_eq!(collider_test(&mover, vel, &touching, 1.0, &config), Some(Hit::Discrete));
    }

    #[test]
    fn scan_visits_each_pair_once() {
        let bodies = vec![
            world(0, vec![Collider::rect(0.0, 0.0, 10.0, 10.0, "a"), Collider::rect(2.0, 2.0, 2.0, 2.0, "a")], None),
            world(1, vec![Collider::rect(5.0, 5.0, 10.0, 10.0, "b")], None),
            world(2, vec![Collider::circle(1.0, 100.0, 100.0, "c")], None),
        ];
        let mut contacts = ContactSet::default();
        let stats = scan(&bodies, 1.0, &Config::default(), &mut contacts);

        assert_eq!(stats.pairs_tested, 3);
        assert_eq!(stats.touching, vec![(0, 1)]);
        assert_eq!(stats.swept_hits, 0);
        // both of 0's colliders are tagged "a", so they collapse into one contact
        assert_eq!(contacts.len(), 1);
        assert!(contacts.contains(&Contact::new(EntityId(1), "b", EntityId(0), "a")));
    }
}
