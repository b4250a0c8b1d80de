// Market data module entrypoint
pub mod adapters;       // one Provider impl per vendor API
pub mod classifier;     // address-like vs symbol-like queries
pub mod http;           // shared JSON-over-HTTPS client
pub mod normaliser;     // vendor strings/numbers -> normalized values
pub mod reports;        // single-call auxiliary reports
pub mod reports_types;
pub mod router;         // fallback chains and search fan-out
pub mod types;          // normalized records

pub use adapters::{Capabilities, Provider};
pub use router::{Aggregator, DefaultProviders, Routes, SharedProvider};
