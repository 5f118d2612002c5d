use crate::models::Pagination;

/// Slice a fully sorted result set into the requested 1-based page
///
/// `total_pages = ceil(total / limit)`; pages beyond the last yield an empty
/// slice rather than an error. Limit bounds are enforced at request
/// validation, never silently clamped here.
pub fn paginate<T>(items: Vec<T>, page: u32, limit: u32) -> (Vec<T>, Pagination) {
    let total = items.len() as u64;
    let total_pages = (total.div_ceil(limit as u64)) as u32;

    let start = (page as usize).saturating_sub(1).saturating_mul(limit as usize);
    let slice: Vec<T> = items
        .into_iter()
        .skip(start)
        .take(limit as usize)
        .collect();

    (
        slice,
        Pagination {
            page,
            limit,
            total,
            total_pages,
        },
    )
}
