/// Membership list handling shared by the team and project engines
///
/// Both engines take a list of names from the caller (usernames for teams,
/// team names for projects), reject an empty list, collapse duplicates and
/// require every name to resolve before anything is written.

use crate::error::{DomainError, DomainResult};

/// Collapses duplicate names, keeping first-seen order
pub fn dedupe(names: &[String]) -> Vec<String> {
    let mut unique: Vec<String> = Vec::with_capacity(names.len());
    for name in names {
        if !unique.contains(name) {
            unique.push(name.clone());
        }
    }
    unique
}

/// A team or project must always have at least one member
pub fn require_non_empty(names: &[String], field: &str) -> DomainResult<()> {
    if names.is_empty() {
        return Err(DomainError::validation(
            field,
            "At least one member is required",
        ));
    }

    Ok(())
}

/// Fails with `NotFound(detail)` unless every requested name resolved
///
/// `requested` must already be deduplicated. Names are unique in storage, so
/// a resolved set of the same size means every name matched.
pub fn require_all_resolved<T>(
    requested: &[String],
    resolved: &[T],
    detail: &str,
) -> DomainResult<()> {
    if resolved.len() != requested.len() {
        return Err(DomainError::not_found(detail));
    }

    Ok(())
}
