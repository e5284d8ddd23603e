//! Property tests for flow balance and tap gating.

use hf_network::{Element, Flow, Network, OutFlow, RecordingObserver, Tolerances};
use proptest::prelude::*;

fn tol() -> Tolerances {
    Tolerances {
        abs: 1e-9,
        rel: 1e-9,
    }
}

/// Normalize raw weights so they sum to 1.0.
fn normalize(weights: &[f64]) -> Vec<f64> {
    let sum: f64 = weights.iter().sum();
    weights.iter().map(|w| w / sum).collect()
}

proptest! {
    #[test]
    fn split_outputs_sum_to_input(production in 0.0_f64..1.0e6, p in 0.0_f64..=1.0) {
        let mut net = Network::new();
        let src = net.add(Element::source("src")).unwrap();
        let sp = net.add(Element::split("sp")).unwrap();
        let a = net.add(Element::sink("a")).unwrap();
        let b = net.add(Element::sink("b")).unwrap();
        net.connect(src, sp).unwrap();
        net.connect_at(sp, a, 0).unwrap();
        net.connect_at(sp, b, 1).unwrap();
        net.set_production(src, production).unwrap();
        net.set_proportions(sp, &[p, 1.0 - p]).unwrap();

        let mut obs = RecordingObserver::new();
        net.simulate(&mut obs);
        let report = obs.flow("sp").unwrap();
        prop_assert!(report.out_flow.total().nearly_eq(report.in_flow, tol()));
    }

    #[test]
    fn multisplit_outputs_sum_to_input(
        production in 0.0_f64..1.0e6,
        weights in prop::collection::vec(0.01_f64..1.0, 2..8),
    ) {
        let n = weights.len();
        let mut net = Network::new();
        let src = net.add(Element::source("src")).unwrap();
        let m = net.add(Element::multisplit("m", n).unwrap()).unwrap();
        net.connect(src, m).unwrap();
        for slot in 0..n {
            let sink = net.add(Element::sink(format!("k{slot}"))).unwrap();
            net.connect_at(m, sink, slot).unwrap();
        }
        net.set_production(src, production).unwrap();
        net.set_proportions(m, &normalize(&weights)).unwrap();

        let mut obs = RecordingObserver::new();
        net.simulate(&mut obs);
        let report = obs.flow("m").unwrap();
        prop_assert_eq!(report.out_flow.as_slice().len(), n);
        prop_assert!(report.out_flow.total().nearly_eq(report.in_flow, tol()));
    }

    #[test]
    fn tap_gates_flow(production in 0.0_f64..1.0e6, open in any::<bool>()) {
        let mut net = Network::new();
        let src = net.add(Element::source("src")).unwrap();
        let tap = net.add(Element::tap("tap")).unwrap();
        let sink = net.add(Element::sink("sink")).unwrap();
        net.connect(src, tap).unwrap();
        net.connect(tap, sink).unwrap();
        net.set_production(src, production).unwrap();
        net.set_open(tap, open).unwrap();

        let mut obs = RecordingObserver::new();
        net.simulate(&mut obs);
        let report = obs.flow("tap").unwrap();
        let expected = if open { report.in_flow } else { Flow::ZERO };
        prop_assert_eq!(&report.out_flow, &OutFlow::Single(expected));
        prop_assert_eq!(obs.flow("sink").unwrap().in_flow, expected);
    }
}
