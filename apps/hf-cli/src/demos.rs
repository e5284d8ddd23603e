//! Built-in demo networks.

use clap::ValueEnum;
use hf_network::{Element, Network, NetworkResult};

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Demo {
    /// Source -> Split -> two sinks
    Split,
    /// Source -> closed Tap -> Sink
    Tap,
    /// A split feeding two limited taps, one over its limit
    Capacity,
    /// Source -> Tap -> Multisplit(3) with a dangling slot
    Multisplit,
}

impl Demo {
    pub fn build(self) -> NetworkResult<Network> {
        match self {
            Demo::Split => split(),
            Demo::Tap => closed_tap(),
            Demo::Capacity => capacity(),
            Demo::Multisplit => multisplit(),
        }
    }
}

fn split() -> NetworkResult<Network> {
    let mut net = Network::new();
    let src = net.add(Element::source("src"))?;
    let sp = net.add(Element::split("sp"))?;
    let a = net.add(Element::sink("a"))?;
    let b = net.add(Element::sink("b"))?;
    net.connect(src, sp)?;
    net.connect_at(sp, a, 0)?;
    net.connect_at(sp, b, 1)?;
    net.set_production(src, 100.0)?;
    Ok(net)
}

fn closed_tap() -> NetworkResult<Network> {
    let mut net = Network::new();
    let src = net.add(Element::source("src"))?;
    let tap = net.add(Element::tap("tap"))?;
    let sink = net.add(Element::sink("sink"))?;
    net.connect(src, tap)?;
    net.connect(tap, sink)?;
    net.set_production(src, 10.0)?;
    net.set_open(tap, false)?;
    Ok(net)
}

fn capacity() -> NetworkResult<Network> {
    let mut net = Network::new();
    let src = net.add(Element::source("src"))?;
    let sp = net.add(Element::split("sp"))?;
    let over = net.add(Element::tap("over"))?;
    let under = net.add(Element::tap("under"))?;
    let k1 = net.add(Element::sink("k1"))?;
    let k2 = net.add(Element::sink("k2"))?;
    net.connect(src, sp)?;
    net.connect_at(sp, over, 0)?;
    net.connect_at(sp, under, 1)?;
    net.connect(over, k1)?;
    net.connect(under, k2)?;
    net.set_production(src, 80.0)?;
    net.set_proportions(sp, &[0.625, 0.375])?;
    net.set_max_flow(over, 40.0)?;
    net.set_max_flow(under, 40.0)?;
    Ok(net)
}

fn multisplit() -> NetworkResult<Network> {
    let mut net = Network::new();
    let src = net.add(Element::source("src"))?;
    let tap = net.add(Element::tap("main"))?;
    let m = net.add(Element::multisplit("m", 3)?)?;
    let a = net.add(Element::sink("a"))?;
    let b = net.add(Element::sink("b"))?;
    net.connect(src, tap)?;
    net.connect(tap, m)?;
    net.connect_at(m, a, 0)?;
    net.connect_at(m, b, 1)?;
    net.set_production(src, 60.0)?;
    net.set_proportions(m, &[0.5, 0.25, 0.25])?;
    Ok(net)
}
