//! Protocolos concretos sobre el núcleo de orquestación.

pub mod flat_json;

pub use flat_json::{DemoHandler, FlatJsonProtocol};
