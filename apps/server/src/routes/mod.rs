//! HTTP resource modules, one per entity family.

pub mod consignments;
pub mod invoices;
pub mod products;
pub mod reports;

/// Headers attached to list responses so clients can page without parsing
/// the body.
pub(crate) fn total_count_headers(count: i64) -> [(&'static str, String); 2] {
    [
        (
            "Access-Control-Expose-Headers",
            "X-Total-Count".to_string(),
        ),
        ("X-Total-Count", count.to_string()),
    ]
}
