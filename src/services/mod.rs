//! Outbound service calls
//!
//! `service_client` performs one call against one configured service;
//! `fan_out` runs it across every active service of a kind.

pub mod fan_out;
pub mod service_client;

pub use fan_out::FanOut;
pub use service_client::ServiceClient;
