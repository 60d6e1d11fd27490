//! Contact identity.

use fnv::FnvBuildHasher;
use indexmap::IndexSet;
use std::fmt;

/// Identity handed out by [`CollisionManager::register`](crate::CollisionManager::register).
///
/// Ids increase monotonically in registration order and are never reused by a manager.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct EntityId(pub u64);

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// One tagged collider of one entity touching one tagged collider of another, for one tick.
///
/// Construction canonicalizes the two sides, so `Contact::new(a, ta, b, tb)` and
/// `Contact::new(b, tb, a, ta)` are equal and hash alike.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Contact {
    a: EntityId,
    tag_a: String,
    b: EntityId,
    tag_b: String,
}

impl Contact {
    pub fn new(a: EntityId, tag_a: &str, b: EntityId, tag_b: &str) -> Contact {
        if (a, tag_a) <= (b, tag_b) {
            Contact { a, tag_a: tag_a.to_owned(), b, tag_b: tag_b.to_owned() }
        } else {
            Contact { a: b, tag_a: tag_b.to_owned(), b: a, tag_b: tag_a.to_owned() }
        }
    }

    /// The side ordered first.
    #[inline]
    pub fn first(&self) -> (EntityId, &str) {
        (self.a, &self.tag_a)
    }
    /// The side ordered second.
    #[inline]
    pub fn second(&self) -> (EntityId, &str) {
        (self.b, &self.tag_b)
    }

    #[inline]
    pub fn involves(&self, id: EntityId) -> bool {
        self.a == id || self.b == id
    }

    /// Returns the side opposite to `id`, if `id` is part of this contact.
    pub fn other(&self, id: EntityId) -> Option<(EntityId, &str)> {
        if self.a == id {
            Some(self.second())
        } else if self.b == id {
            Some(self.first())
        } else {
            None
        }
    }
}

/// Contacts of one tick, in discovery order.
pub type ContactSet = IndexSet<Contact, FnvBuildHasher>;

#[cfg(test)]
mod tests {
    use super::*;
    use fnv::FnvHashSet;

    #[test]
    fn swapped_sides_are_one_contact() {
        let c1 = Contact::new(EntityId(3), "player", EntityId(1), "ground");
        let c2 = Contact::new(EntityId(1), "ground", EntityId(3), "player");
        assert_eq!(c1, c2);
        assert_eq!(c1.first(), (EntityId(1), "ground"));
        assert_eq!(c1.second(), (EntityId(3), "player"));

        let mut set = FnvHashSet::default();
        set.insert(c1);
        assert!(!set.insert(c2));
    }

    #[test]
    fn tags_distinguish_contacts() {
        let ground = Contact::new(EntityId(0), "player", EntityId(1), "ground");
        let death = Contact::new(EntityId(0), "player", EntityId(1), "death");
        assert_ne!(ground, death);

        // same tag pair, mirrored across the two entities
        let ab = Contact::new(EntityId(0), "x", EntityId(1), "y");
        let ba = Contact::new(EntityId(0), "y", EntityId(1), "x");
        assert_ne!(ab, ba);
    }

    #[test]
    fn other_side() {
        let c = Contact::new(EntityId(7), "wall", EntityId(2), "player");
        assert!(c.involves(EntityId(7)));
        assert!(!c.involves(EntityId(5)));
        assert_eq!(c.other(EntityId(7)), Some((EntityId(2), "player")));
        assert_eq!(c.other(EntityId(2)), Some((EntityId(7), "wall")));
        assert_eq!(c.other(EntityId(5)), None);
    }

    #[test]
    fn insertion_order_is_kept() {
        let mut set = ContactSet::default();
        set.insert(Contact::new(EntityId(4), "b", EntityId(5), "b"));
        set.insert(Contact::new(EntityId(0), "a", EntityId(1), "a"));
        let firsts: Vec<_> = set.iter().map(|c| c.first().0).collect();
        assert_eq!(firsts, vec![EntityId(4), EntityId(0)]);
    }
}
