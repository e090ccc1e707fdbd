//! # Consignment Write-Off
//!
//! The FIFO stock-accounting algorithm at the heart of the ledger.
//!
//! ## How a Sale Depletes Stock
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────┐
//! │  Product stock lives in consignments, in arrival order:             │
//! │                                                                     │
//! │    #1 current=3     #2 current=5     #3 current=4                   │
//! │                                                                     │
//! │  write_off(5):                                                      │
//! │                                                                     │
//! │    #1 current=0 ✝   #2 current=3     #3 current=4                   │
//! │       depreciated      (5-2)            untouched                   │
//! │                                                                     │
//! │  Oldest arrivals are consumed first. A consignment whose remaining  │
//! │  quantity reaches zero is marked depreciated.                       │
//! └─────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The function is pure mutation over an in-memory slice; atomicity comes
//! from the store transaction wrapping the whole invoice operation in
//! sklad-db. There is no rollback mechanism here.

use crate::types::Consignment;

/// Deducts `to_write_off` units across `consignments`, oldest arrival first.
///
/// The slice must be ordered by arrival (ascending `consignment_number`).
/// Each consignment touched is partially or fully depleted; a fully depleted
/// consignment is marked depreciated. Iteration stops as soon as nothing
/// remains to write off.
///
/// ## Precondition
/// `to_write_off <= stock_total(consignments)`, enforced by the caller. The
/// algorithm only checks per-consignment coverage.
///
/// Already-depreciated consignments (current quantity zero) are harmless
/// pass-throughs and are never skipped ahead of.
pub fn write_off(consignments: &mut [Consignment], to_write_off: i64) {
    let mut remaining = to_write_off;

    for consignment in consignments.iter_mut() {
        let new_quantity = if consignment.current_quantity <= remaining {
            0
        } else {
            consignment.current_quantity - remaining
        };

        if new_quantity == 0 {
            consignment.depreciated = true;
        }

        remaining -= remaining.min(consignment.current_quantity);
        consignment.current_quantity = new_quantity;

        if remaining == 0 {
            break;
        }
    }
}

/// Current stock of a product: sum of remaining quantities over its
/// consignments. Depreciated consignments hold zero, so summing
/// unconditionally is equivalent to filtering them out.
pub fn stock_total(consignments: &[Consignment]) -> i64 {
    consignments.iter().map(|c| c.current_quantity).sum()
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn consignment(number: i64, quantity: i64, current: i64) -> Consignment {
        Consignment {
            id: number,
            consignment_number: number,
            arrival_date: Utc::now(),
            product_id: 1,
            income_invoice_item_id: number,
            quantity,
            current_quantity: current,
            depreciated: current == 0,
            total_price: quantity * 100,
        }
    }

    #[test]
    fn test_spans_two_consignments() {
        // C1(current=3), C2(current=5); write_off(5) => C1=0 depreciated,
        // C2=3 not depreciated.
        let mut consignments = vec![consignment(1, 3, 3), consignment(2, 5, 5)];

        write_off(&mut consignments, 5);

        assert_eq!(consignments[0].current_quantity, 0);
        assert!(consignments[0].depreciated);
        assert_eq!(consignments[1].current_quantity, 3);
        assert!(!consignments[1].depreciated);
    }

    #[test]
    fn test_exact_depletion_does_not_touch_next() {
        let mut consignments = vec![consignment(1, 3, 3), consignment(2, 5, 5)];

        write_off(&mut consignments, 3);

        assert_eq!(consignments[0].current_quantity, 0);
        assert!(consignments[0].depreciated);
        // No over-subtraction into the next consignment.
        assert_eq!(consignments[1].current_quantity, 5);
        assert!(!consignments[1].depreciated);
    }

    #[test]
    fn test_partial_within_first() {
        let mut consignments = vec![consignment(1, 10, 10), consignment(2, 4, 4)];

        write_off(&mut consignments, 6);

        assert_eq!(consignments[0].current_quantity, 4);
        assert!(!consignments[0].depreciated);
        assert_eq!(consignments[1].current_quantity, 4);
    }

    #[test]
    fn test_depreciated_iff_zero() {
        let mut consignments = vec![
            consignment(1, 2, 2),
            consignment(2, 3, 3),
            consignment(3, 4, 4),
        ];

        write_off(&mut consignments, 5);

        for c in &consignments {
            assert_eq!(c.depreciated, c.current_quantity == 0, "#{}", c.consignment_number);
        }
    }

    #[test]
    fn test_zero_quantity_consignment_is_pass_through() {
        // An already-depreciated consignment in front must not absorb or
        // block the write-off.
        let mut consignments = vec![consignment(1, 3, 0), consignment(2, 5, 5)];

        write_off(&mut consignments, 2);

        assert_eq!(consignments[0].current_quantity, 0);
        assert!(consignments[0].depreciated);
        assert_eq!(consignments[1].current_quantity, 3);
    }

    #[test]
    fn test_quantity_conservation_over_sequence() {
        let mut consignments = vec![
            consignment(1, 4, 4),
            consignment(2, 6, 6),
            consignment(3, 5, 5),
        ];
        let initial = stock_total(&consignments);
        let mut written_off = 0;

        for amount in [3, 1, 6, 2] {
            write_off(&mut consignments, amount);
            written_off += amount;

            assert_eq!(stock_total(&consignments), initial - written_off);
            assert!(consignments.iter().all(|c| c.current_quantity >= 0));
            assert!(consignments
                .iter()
                .all(|c| c.current_quantity <= c.quantity));
        }
    }

    #[test]
    fn test_full_depletion() {
        let mut consignments = vec![consignment(1, 3, 3), consignment(2, 5, 5)];

        write_off(&mut consignments, 8);

        assert_eq!(stock_total(&consignments), 0);
        assert!(consignments.iter().all(|c| c.depreciated));
    }
}
