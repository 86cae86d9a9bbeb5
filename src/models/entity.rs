//! Traits implemented by every moderated entity kind.

use std::fmt::Debug;
use std::hash::Hash;

use serde::de::DeserializeOwned;
use serde::Serialize;

/// Closed status enum of an entity kind.
pub trait EntityStatus:
    Copy + Debug + Eq + Hash + Send + Sync + Serialize + DeserializeOwned + 'static
{
    /// Every variant, in display order.
    const ALL: &'static [Self];

    /// Wire name, identical to the serde representation.
    fn as_str(&self) -> &'static str;

    /// Whether the moderation workflow allows moving from `self` to `next`.
    fn can_transition_to(&self, next: &Self) -> bool;
}

/// An entity that can be filtered by [`Criteria`](super::criteria::Criteria)
/// and served by an entity source.
pub trait Listable: Clone + Debug + Send + Sync + Serialize + DeserializeOwned + 'static {
    type Status: EntityStatus;

    /// Name used in logs and not-found messages.
    const KIND: &'static str;

    fn id(&self) -> &str;

    /// Identifier matched by `codeLike`.
    fn code(&self) -> &str;

    /// Free text matched by `messageLike`.
    fn text(&self) -> &str;

    fn status(&self) -> Self::Status;

    fn set_status(&mut self, status: Self::Status);

    /// Owning entity id, for kinds nested under another entity.
    fn parent_id(&self) -> Option<&str> {
        None
    }
}
