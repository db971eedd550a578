//! HTTP access to the banking backend.

pub mod http_gateway;
mod wire;

pub use http_gateway::HttpBankingGateway;
