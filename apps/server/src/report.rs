//! # Report Documents
//!
//! Builds the periodic and stock-snapshot report documents.
//!
//! Everything here is pure formatting over data the route handler already
//! fetched; the only side effect is [`write_document`], which writes the
//! finished document under the configured reports directory. Rendering to a
//! richer format (PDF) is a concern of an external collaborator; the content
//! contract lives here.

use std::io;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};

use chrono::{DateTime, Utc};

use sklad_core::{InvoiceType, Money};

/// Process-wide sequence number stamped into periodic report filenames and
/// headers.
static REPORT_INDEX: AtomicUsize = AtomicUsize::new(1);

/// Date format used inside filenames.
const FILE_DATE_FORMAT: &str = "%y_%m_%d";

/// Date format used inside report bodies.
const DISPLAY_DATE_FORMAT: &str = "%Y/%m/%d %H:%M:%S";

fn next_report_index() -> usize {
    REPORT_INDEX.fetch_add(1, Ordering::SeqCst)
}

fn kind_name(kind: InvoiceType) -> &'static str {
    match kind {
        InvoiceType::Sale => "SaleInvoice",
        InvoiceType::Income => "IncomeInvoice",
    }
}

// =============================================================================
// Input data
// =============================================================================

/// One invoice item, resolved to its product name.
#[derive(Debug, Clone)]
pub struct ItemLine {
    pub product_name: String,
    /// Total price in minor units.
    pub total_price: i64,
    pub quantity: i64,
    /// Present on income items only.
    pub arrival_date: Option<DateTime<Utc>>,
}

/// One invoice with its resolved items.
#[derive(Debug, Clone)]
pub struct InvoiceBlock {
    pub id: i64,
    pub date: DateTime<Utc>,
    pub items: Vec<ItemLine>,
}

/// One product row of the stock-snapshot report.
#[derive(Debug, Clone)]
pub struct ProductLine {
    pub name: String,
    /// Live stock (sum of remaining consignment quantities).
    pub current_quantity: i64,
    /// Reconstructed stock as of the requested date.
    pub date_quantity: i64,
    /// Cost price in minor units.
    pub cost_price: i64,
}

// =============================================================================
// Documents
// =============================================================================

/// A finished report: target filename plus content lines.
#[derive(Debug, Clone)]
pub struct ReportDocument {
    pub filename: String,
    pub lines: Vec<String>,
}

impl ReportDocument {
    /// The full document body.
    pub fn body(&self) -> String {
        self.lines.join("")
    }
}

fn format_item(item: &ItemLine) -> String {
    let mut block = format!(
        "---- Product name - {}\n---- Total price - {}\n---- Quantity - {}\n",
        item.product_name,
        Money::format_price(item.total_price),
        item.quantity
    );

    if let Some(arrival) = item.arrival_date {
        block.push_str(&format!(
            "---- Arrival date - {}\n",
            arrival.format(DISPLAY_DATE_FORMAT)
        ));
    }

    block
}

fn format_invoice(kind: InvoiceType, invoice: &InvoiceBlock) -> String {
    let items = invoice
        .items
        .iter()
        .map(format_item)
        .collect::<Vec<_>>()
        .join("\n");

    format!(
        "{}#{}\nCreation date - {}\nItems: \n\n{}",
        kind_name(kind),
        invoice.id,
        invoice.date.format(DISPLAY_DATE_FORMAT),
        items
    )
}

/// Builds a periodic report over the invoices of one kind within a date
/// range: a header with the period and the summed total, then one block per
/// invoice.
pub fn periodical_document(
    kind: InvoiceType,
    start: DateTime<Utc>,
    end: DateTime<Utc>,
    invoices: &[InvoiceBlock],
) -> ReportDocument {
    let index = next_report_index();
    let total: i64 = invoices
        .iter()
        .flat_map(|invoice| invoice.items.iter())
        .map(|item| item.total_price)
        .sum();

    let start_date = start.format(FILE_DATE_FORMAT);
    let end_date = end.format(FILE_DATE_FORMAT);

    let mut lines = vec![format!(
        "Report{}\nFrom period {} to {}\nTotal money - {}\n\n",
        index,
        start_date,
        end_date,
        Money::format_price(total)
    )];
    lines.extend(invoices.iter().map(|invoice| format_invoice(kind, invoice)));

    ReportDocument {
        filename: format!(
            "{}Report{}_{}_to_{}.txt",
            kind_name(kind),
            index,
            start_date,
            end_date
        ),
        lines,
    }
}

/// Builds the stock-snapshot report: every product with its live stock and
/// its reconstructed stock as of the requested date.
pub fn stock_document(date: DateTime<Utc>, products: &[ProductLine]) -> ReportDocument {
    let display_date = date.format(DISPLAY_DATE_FORMAT);

    let product_blocks = products
        .iter()
        .map(|product| {
            format!(
                "---- Product name - {}\n---- Current quantity - {}\n\
                 ---- Quantity for date {} - {}\n---- Product price - {}\n",
                product.name,
                product.current_quantity,
                display_date,
                product.date_quantity,
                Money::format_price(product.cost_price)
            )
        })
        .collect::<Vec<_>>()
        .join("\n");

    let lines = vec![
        format!("Report\nUntil the date - {}\n\n", date.format(FILE_DATE_FORMAT)),
        product_blocks,
    ];

    ReportDocument {
        filename: format!("ProductRestReport_{}.txt", date.format(FILE_DATE_FORMAT)),
        lines,
    }
}

/// Writes the document under `dir` and returns the full path.
pub fn write_document(dir: &Path, document: &ReportDocument) -> io::Result<PathBuf> {
    std::fs::create_dir_all(dir)?;
    let path = dir.join(&document.filename);
    std::fs::write(&path, document.body())?;
    Ok(path)
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use sklad_core::parse_timestamp;

    fn ts(raw: &str) -> DateTime<Utc> {
        parse_timestamp(raw).unwrap()
    }

    #[test]
    fn test_periodical_document_totals_and_blocks() {
        let invoices = vec![InvoiceBlock {
            id: 4,
            date: ts("2026-02-10T12:00:00.000Z"),
            items: vec![
                ItemLine {
                    product_name: "Wheel".to_string(),
                    total_price: 10000,
                    quantity: 2,
                    arrival_date: None,
                },
                ItemLine {
                    product_name: "Engine".to_string(),
                    total_price: 2500,
                    quantity: 1,
                    arrival_date: None,
                },
            ],
        }];

        let doc = periodical_document(
            InvoiceType::Sale,
            ts("2026-02-01T00:00:00.000Z"),
            ts("2026-02-28T00:00:00.000Z"),
            &invoices,
        );

        assert!(doc.filename.starts_with("SaleInvoiceReport"));
        assert!(doc.filename.ends_with("_26_02_01_to_26_02_28.txt"));

        let body = doc.body();
        assert!(body.contains("From period 26_02_01 to 26_02_28"));
        // 100.00 + 25.00
        assert!(body.contains(&format!("Total money - {}", Money::format_price(12500))));
        assert!(body.contains("SaleInvoice#4"));
        assert!(body.contains("---- Product name - Wheel"));
        assert!(body.contains("---- Quantity - 2"));
        assert!(!body.contains("Arrival date"));
    }

    #[test]
    fn test_income_items_carry_arrival_date() {
        let invoices = vec![InvoiceBlock {
            id: 1,
            date: ts("2026-02-10T12:00:00.000Z"),
            items: vec![ItemLine {
                product_name: "Wheel".to_string(),
                total_price: 10000,
                quantity: 3,
                arrival_date: Some(ts("2026-02-09T08:30:00.000Z")),
            }],
        }];

        let doc = periodical_document(
            InvoiceType::Income,
            ts("2026-02-01T00:00:00.000Z"),
            ts("2026-02-28T00:00:00.000Z"),
            &invoices,
        );

        let body = doc.body();
        assert!(body.contains("IncomeInvoice#1"));
        assert!(body.contains("---- Arrival date - 2026/02/09 08:30:00"));
    }

    #[test]
    fn test_stock_document() {
        let products = vec![ProductLine {
            name: "Wheel".to_string(),
            current_quantity: 3,
            date_quantity: 5,
            cost_price: 5000,
        }];

        let doc = stock_document(ts("2026-02-15T00:00:00.000Z"), &products);

        assert_eq!(doc.filename, "ProductRestReport_26_02_15.txt");
        let body = doc.body();
        assert!(body.contains("Until the date - 26_02_15"));
        assert!(body.contains("---- Current quantity - 3"));
        assert!(body.contains("---- Quantity for date 2026/02/15 00:00:00 - 5"));
        assert!(body.contains(&format!(
            "---- Product price - {}",
            Money::format_price(5000)
        )));
    }

    #[test]
    fn test_write_document() {
        let dir = std::env::temp_dir().join("sklad-report-test");
        let doc = ReportDocument {
            filename: "test.txt".to_string(),
            lines: vec!["hello\n".to_string(), "world\n".to_string()],
        };

        let path = write_document(&dir, &doc).unwrap();
        let content = std::fs::read_to_string(&path).unwrap();
        assert_eq!(content, "hello\nworld\n");

        std::fs::remove_file(path).ok();
    }
}
