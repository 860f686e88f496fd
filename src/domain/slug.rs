//! Collision-free slug resolution.
//!
//! Candidates come from [`transliterate`] or from a value the caller already
//! set by hand. Uniqueness is decided by a caller-supplied predicate so the
//! probing loop stays independent of any persistence layer: the predicate
//! answers "is this value taken by some *other* record", and the resolver
//! tries `base`, `base-1`, `base-2`, … until it reports a free value.

use std::future::Future;
use std::num::NonZeroU32;

use thiserror::Error;
use tracing::debug;

use super::transliterate::transliterate;

/// Errors that can occur while resolving a unique slug.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum SlugError {
    #[error("exhausted {attempts} attempts to find a unique slug for `{base}`")]
    Exhausted { base: String, attempts: u32 },
}

/// Errors that can occur while resolving a slug via an async uniqueness check.
#[derive(Debug, Error)]
pub enum SlugAsyncError<E>
where
    E: std::error::Error + Send + Sync + 'static,
{
    #[error(transparent)]
    Slug(#[from] SlugError),
    #[error(transparent)]
    Predicate(E),
}

/// Return `candidate` or the first `candidate-N` (N = 1, 2, …) for which
/// `exists` reports `false`.
///
/// There is no attempt limit: a predicate that never returns `false` keeps
/// this looping. Use [`resolve_unique_bounded`] when that must be ruled out.
pub fn resolve_unique<F>(candidate: &str, mut exists: F) -> String
where
    F: FnMut(&str) -> bool,
{
    let mut value = candidate.to_string();
    let mut counter: u64 = 1;

    while exists(&value) {
        debug!(candidate = %value, "slug already taken");
        value = suffixed(candidate, counter);
        counter += 1;
    }

    value
}

/// Same probing order as [`resolve_unique`], giving up after `max_attempts`
/// suffixed candidates.
pub fn resolve_unique_bounded<F>(
    candidate: &str,
    max_attempts: NonZeroU32,
    mut exists: F,
) -> Result<String, SlugError>
where
    F: FnMut(&str) -> bool,
{
    if !exists(candidate) {
        return Ok(candidate.to_string());
    }

    for attempt in 1..=max_attempts.get() {
        let value = suffixed(candidate, attempt.into());
        if !exists(&value) {
            return Ok(value);
        }
    }

    Err(SlugError::Exhausted {
        base: candidate.to_string(),
        attempts: max_attempts.get(),
    })
}

/// Async variant of the resolver that awaits a fallible predicate.
///
/// `max_attempts = None` tries suffixes without limit, like [`resolve_unique`].
pub async fn resolve_unique_async<F, Fut, E>(
    candidate: &str,
    max_attempts: Option<NonZeroU32>,
    mut exists: F,
) -> Result<String, SlugAsyncError<E>>
where
    F: FnMut(&str) -> Fut,
    Fut: Future<Output = Result<bool, E>>,
    E: std::error::Error + Send + Sync + 'static,
{
    let mut value = candidate.to_string();
    let mut counter: u64 = 1;

    while exists(&value).await.map_err(SlugAsyncError::Predicate)? {
        debug!(candidate = %value, "slug already taken");
        if let Some(limit) = max_attempts
            && counter > u64::from(limit.get())
        {
            return Err(SlugAsyncError::Slug(SlugError::Exhausted {
                base: candidate.to_string(),
                attempts: limit.get(),
            }));
        }
        value = suffixed(candidate, counter);
        counter += 1;
    }

    Ok(value)
}

/// Decide the value a record's slug field should hold before it is saved.
///
/// A non-empty `current` value is a manual override and is kept verbatim,
/// otherwise `source` is transliterated. Empty results skip uniqueness
/// resolution entirely.
pub fn get_value<F>(current: &str, source: &str, validate_unique: bool, exists: F) -> String
where
    F: FnMut(&str) -> bool,
{
    let candidate = candidate_for(current, source);

    if candidate.is_empty() || !validate_unique {
        return candidate;
    }

    resolve_unique(&candidate, exists)
}

/// [`get_value`] with an upper bound on suffixed candidates.
pub fn get_value_bounded<F>(
    current: &str,
    source: &str,
    validate_unique: bool,
    max_attempts: NonZeroU32,
    exists: F,
) -> Result<String, SlugError>
where
    F: FnMut(&str) -> bool,
{
    let candidate = candidate_for(current, source);

    if candidate.is_empty() || !validate_unique {
        return Ok(candidate);
    }

    resolve_unique_bounded(&candidate, max_attempts, exists)
}

/// Async counterpart of [`get_value`] used by the record lifecycle hooks.
pub async fn get_value_async<F, Fut, E>(
    current: &str,
    source: &str,
    validate_unique: bool,
    max_attempts: Option<NonZeroU32>,
    exists: F,
) -> Result<String, SlugAsyncError<E>>
where
    F: FnMut(&str) -> Fut,
    Fut: Future<Output = Result<bool, E>>,
    E: std::error::Error + Send + Sync + 'static,
{
    let candidate = candidate_for(current, source);

    if candidate.is_empty() || !validate_unique {
        return Ok(candidate);
    }

    resolve_unique_async(&candidate, max_attempts, exists).await
}

fn candidate_for(current: &str, source: &str) -> String {
    if current.is_empty() {
        transliterate(source)
    } else {
        current.to_string()
    }
}

fn suffixed(base: &str, counter: u64) -> String {
    format!("{base}-{counter}")
}
