//! Criteria filter: AND-composition of the active listing predicates.

use std::collections::HashSet;

use crate::models::criteria::Criteria;
use crate::models::entity::Listable;

/// A single listing condition over an entity.
pub type Predicate<'c, E> = Box<dyn Fn(&E) -> bool + Send + Sync + 'c>;

/// Build one predicate per active criteria field.
pub fn build_predicates<'c, E: Listable>(
    criteria: &'c Criteria<E::Status>,
) -> Vec<Predicate<'c, E>> {
    let mut predicates: Vec<Predicate<'c, E>> = Vec::new();

    if let Some(code) = criteria.code_like.as_deref().filter(|s| !s.is_empty()) {
        let needle = code.to_lowercase();
        predicates.push(Box::new(move |e: &E| e.code().to_lowercase().contains(&needle)));
    }

    if let Some(text) = criteria.message_like.as_deref().filter(|s| !s.is_empty()) {
        let needle = text.to_lowercase();
        predicates.push(Box::new(move |e: &E| e.text().to_lowercase().contains(&needle)));
    }

    if let Some(statuses) = criteria.status_in.as_deref().filter(|s| !s.is_empty()) {
        predicates.push(Box::new(move |e: &E| statuses.contains(&e.status())));
    }

    if let Some(ids) = criteria.id_not_in.as_deref().filter(|s| !s.is_empty()) {
        let excluded: HashSet<&str> = ids.iter().map(String::as_str).collect();
        predicates.push(Box::new(move |e: &E| !excluded.contains(e.id())));
    }

    predicates
}

/// Order-preserving subsequence of `items` matching all criteria.
pub fn filter<'a, E: Listable>(items: &'a [E], criteria: &Criteria<E::Status>) -> Vec<&'a E> {
    let predicates = build_predicates(criteria);
    items
        .iter()
        .filter(|item| predicates.iter().all(|p| p(*item)))
        .collect()
}
