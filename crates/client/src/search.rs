//! Client-side search over fetched lists

/// Something that can be found by the search box
pub trait Searchable {
    /// The fields a search term is matched against
    fn search_fields(&self) -> Vec<&str>;
}

/// Check if any searchable field contains `term`, ignoring case. The empty term matches everything.
pub fn matches<T: Searchable>(item: &T, term: &str) -> bool {
    let term = term.to_lowercase();
    item.search_fields()
        .into_iter()
        .any(|f| f.to_lowercase().contains(&term))
}

/// Indices of the items that match `term`, in the order they were given.
pub fn filter<T: Searchable>(items: &[T], term: &str) -> Vec<usize> {
    items
        .iter()
        .enumerate()
        .filter(|(_, i)| matches(*i, term))
        .map(|(idx, _)| idx)
        .collect()
}
