//! Source capability invoked on a cache miss.

use async_trait::async_trait;

use crate::error::Result;

// == Getter ==
/// Loads the authoritative value for a key when no cache holds it.
///
/// Return [`CacheError::NotFound`](crate::error::CacheError::NotFound) when the
/// key does not exist, and [`CacheError::Source`](crate::error::CacheError::Source)
/// for anything else.
#[async_trait]
pub trait Getter: Send + Sync {
    async fn get(&self, key: &str) -> Result<Vec<u8>>;
}

// == Getter Func ==
/// Adapts a plain function or closure into a [`Getter`].
///
/// ```ignore
/// let getter = GetterFunc(|key: &str| Ok(key.as_bytes().to_vec()));
/// ```
pub struct GetterFunc<F>(pub F);

#[async_trait]
impl<F> Getter for GetterFunc<F>
where
    F: Fn(&str) -> Result<Vec<u8>> + Send + Sync,
{
    async fn get(&self, key: &str) -> Result<Vec<u8>> {
        (self.0)(key)
    }
}
