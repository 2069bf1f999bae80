use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::io::Write;
use tracing::info;

use crate::domain::{Cents, ExpenseRecord, Ledger, format_cents};
use crate::error::Result;

/// Column header of the CSV export. Re-importers and diffs depend on it.
pub const CSV_HEADER: [&str; 5] = ["Date", "Category", "Amount", "Notes", "Payment Method"];

/// Session snapshot for JSON export
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LedgerSnapshot {
    pub version: String,
    pub exported_at: DateTime<Utc>,
    pub records: Vec<ExpenseRecord>,
    pub total: Cents,
}

/// Exporter for serializing a ledger. Writing the bytes anywhere durable
/// is the caller's concern.
pub struct Exporter<'a> {
    ledger: &'a Ledger,
}

impl<'a> Exporter<'a> {
    pub fn new(ledger: &'a Ledger) -> Self {
        Self { ledger }
    }

    /// Export every record to CSV, in entry order. Returns the number of data rows.
    pub fn export_csv<W: Write>(&self, writer: W) -> Result<usize> {
        let mut csv_writer = csv::Writer::from_writer(writer);
        csv_writer.write_record(CSV_HEADER)?;

        let mut count = 0;
        for record in self.ledger.all() {
            csv_writer.write_record([
                record.date.format("%Y-%m-%d").to_string(),
                record.category.as_str().to_string(),
                format_cents(record.amount_cents),
                record.notes.clone(),
                record.payment_method.as_str().to_string(),
            ])?;
            count += 1;
        }

        csv_writer.flush()?;
        info!(rows = count, "Exported expenses to CSV");
        Ok(count)
    }

    /// CSV export as an in-memory string.
    pub fn to_csv_string(&self) -> Result<String> {
        let mut buffer = Vec::new();
        self.export_csv(&mut buffer)?;
        Ok(String::from_utf8_lossy(&buffer).into_owned())
    }

    /// Export the whole session as a pretty-printed JSON snapshot
    pub fn export_json<W: Write>(&self, mut writer: W) -> Result<LedgerSnapshot> {
        let snapshot = LedgerSnapshot {
            version: env!("CARGO_PKG_VERSION").to_string(),
            exported_at: Utc::now(),
            records: self.ledger.all().to_vec(),
            total: self.ledger.total(),
        };

        let json = serde_json::to_string_pretty(&snapshot)?;
        writer.write_all(json.as_bytes())?;
        writer.flush()?;

        info!(records = snapshot.records.len(), "Exported session snapshot");
        Ok(snapshot)
    }
}
