use serde::Serialize;
use serde::de::DeserializeOwned;
use std::fmt::Debug;

/// An entity shape that a provider can cache.
///
/// Identity is server-assigned and immutable, so `id` is the only key the
/// cache uses for replacement and removal. `foreign_key` is what
/// `get_by_foreign_key` lookups match against.
pub trait Resource:
    Debug + Clone + PartialEq + Serialize + DeserializeOwned + Send + Sync + 'static
{
    /// Server-assigned identifier.
    fn id(&self) -> &str;

    /// Human-readable label used in listings and notifications.
    fn display_name(&self) -> &str;

    /// The grouping reference this entity carries, if any.
    fn foreign_key(&self) -> Option<&str> {
        None
    }
}
