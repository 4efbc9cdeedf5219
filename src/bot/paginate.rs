/// One fixed-size window onto an ordered collection.
#[derive(Debug, PartialEq, Eq)]
pub struct Page<'a, T> {
    pub number: usize,
    pub items: &'a [T],
    pub has_prev: bool,
    pub has_next: bool,
    pub total_pages: usize,
}

/// Slice `items[number*size .. number*size+size]`, clamped to the collection. Pages past the
/// end are empty but still report `has_prev`.
///
/// # Panics
///
/// Panics if `size` is zero.
pub fn paginate<T>(items: &[T], number: usize, size: usize) -> Page<'_, T> {
    assert!(size > 0, "page size must be positive");
    let start = number.saturating_mul(size);
    let end = start.saturating_add(size);
    let window: &[T] = if start < items.len() {
        &items[start..end.min(items.len())]
    } else {
        &[]
    };
    Page {
        number,
        items: window,
        has_prev: number > 0,
        has_next: end < items.len(),
        total_pages: items.len().div_ceil(size),
    }
}
