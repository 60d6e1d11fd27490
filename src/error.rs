use crate::EntityId;

/// Contract violations raised while reading an entity's geometry.
///
/// Degenerate geometry (zero-sized shapes, no motion) is never an error.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// The entity exposed no colliders.
    #[error("entity {0} has no colliders")]
    NoColliders(EntityId),

    /// A collider held a NaN or infinity once moved into world space.
    #[error("entity {entity} has non-finite geometry (collider {tag:?})")]
    NonFinite { entity: EntityId, tag: String },

    /// The velocity held a NaN or infinity.
    #[error("entity {0} has a non-finite velocity")]
    NonFiniteVelocity(EntityId),

    /// A collider had an empty tag.
    #[error("entity {0} has a collider with an empty tag")]
    EmptyTag(EntityId),

    /// The entity was already borrowed when the manager needed it.
    #[error("entity {0} is already borrowed")]
    Busy(EntityId),

    /// No entity is registered under this id.
    #[error("entity {0} is not registered")]
    UnknownEntity(EntityId),
}

pub type Result<T> = std::result::Result<T, Error>;
