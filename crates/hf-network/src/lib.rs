//! hf-network: hydraulic network engine for hydroflow.
//!
//! Provides:
//! - Element variants (Source, Tap, Split, Multisplit, Sink) with optional capacity limits
//! - The network container (arena of elements plus a stored simulation order)
//! - Single-pass flow propagation and advisory capacity validation
//! - Splice-out node removal and a text layout renderer
//!
//! # Example
//!
//! ```
//! use hf_network::{Element, Network, RecordingObserver};
//!
//! let mut net = Network::new();
//! let src = net.add(Element::source("src")).unwrap();
//! let sp = net.add(Element::split("sp")).unwrap();
//! let a = net.add(Element::sink("a")).unwrap();
//! let b = net.add(Element::sink("b")).unwrap();
//! net.connect(src, sp).unwrap();
//! net.connect_at(sp, a, 0).unwrap();
//! net.connect_at(sp, b, 1).unwrap();
//! net.set_production(src, 100.0).unwrap();
//!
//! let mut obs = RecordingObserver::default();
//! net.simulate(&mut obs);
//! assert_eq!(obs.flow("a").unwrap().in_flow.value(), Some(50.0));
//! ```

pub mod editor;
pub mod element;
pub mod error;
pub mod layout;
pub mod network;
pub mod observer;
pub mod simulate;

// Re-exports for ergonomics
pub use element::{Element, ElementKind, Variant};
pub use error::{NetworkError, NetworkResult};
pub use network::{Network, ProportionDefect};
pub use observer::{
    CapacityObserver, CapacityViolation, FlowObserver, FlowReport, OutFlow, RecordingObserver,
};
pub use simulate::{PassSummary, SimulationOptions};

pub use hf_core::{ElementId, Flow, Real, Tolerances};
