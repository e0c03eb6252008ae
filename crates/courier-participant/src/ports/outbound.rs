//! # Driven Ports (Outbound SPI)

use crate::domain::LatencyRecord;

/// Destination for latency records, called once per received message.
///
/// File formats and locations belong to the implementor.
pub trait LatencySink: Send {
    /// Persist one record.
    fn record(&mut self, record: &LatencyRecord) -> std::io::Result<()>;
}

/// Keeps every record in memory.
impl LatencySink for Vec<LatencyRecord> {
    fn record(&mut self, record: &LatencyRecord) -> std::io::Result<()> {
        self.push(record.clone());
        Ok(())
    }
}
