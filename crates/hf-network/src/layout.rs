//! Text rendering of the network topology.
//!
//! ```text
//! [src]Source -> [sp]Split +-A-> [a]Sink
//!                          |
//!                          +-B-> [t]Tap -> [b]Sink
//! ```
//!
//! Branches of a split start at the column where the split's text ended and are
//! labelled A, B, C, ... in slot order. An unconnected slot renders as `*`.

use hf_core::ElementId;

use crate::network::Network;

const OPEN_SLOT: char = '*';

impl Network {
    /// Render the tree rooted at the first stored element.
    pub fn layout(&self) -> String {
        match self.order.first() {
            Some(&root) => self.layout_from(root),
            None => String::new(),
        }
    }

    /// Render the tree rooted at `root`, depth first, outputs in slot order.
    ///
    /// The network is assumed acyclic.
    pub fn layout_from(&self, root: ElementId) -> String {
        let mut out = String::new();
        if self.get(root).is_some() {
            self.render(root, &mut out);
        }
        out
    }

    fn render(&self, id: ElementId, out: &mut String) {
        let Some(element) = self.get(id) else {
            out.push(OPEN_SLOT);
            return;
        };
        out.push_str(&format!("[{}]{}", element.name(), element.kind()));

        let outputs = element.outputs();
        match outputs {
            [] => {}
            [next] => {
                out.push_str(" -> ");
                self.render_slot(*next, out);
            }
            _ => {
                out.push(' ');
                let column = current_column(out);
                for (i, next) in outputs.iter().enumerate() {
                    if i > 0 {
                        out.push('\n');
                        pad(out, column);
                        out.push('|');
                        out.push('\n');
                        pad(out, column);
                    }
                    out.push_str(&format!("+-{}-> ", branch_label(i)));
                    self.render_slot(*next, out);
                }
            }
        }
    }

    fn render_slot(&self, slot: Option<ElementId>, out: &mut String) {
        match slot {
            Some(next) => self.render(next, out),
            None => out.push(OPEN_SLOT),
        }
    }
}

fn current_column(out: &str) -> usize {
    out.rsplit('\n').next().map_or(0, |line| line.chars().count())
}

fn pad(out: &mut String, width: usize) {
    out.extend(std::iter::repeat_n(' ', width));
}

/// Spreadsheet-style labels: A..Z, AA, AB, ...
fn branch_label(index: usize) -> String {
    let mut n = index + 1;
    let mut label = Vec::new();
    while n > 0 {
        let rem = (n - 1) % 26;
        label.push(char::from(b'A' + rem as u8));
        n = (n - 1) / 26;
    }
    label.iter().rev().collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::element::Element;

    #[test]
    fn labels() {
        assert_eq!(branch_label(0), "A");
        assert_eq!(branch_label(2), "C");
        assert_eq!(branch_label(25), "Z");
        assert_eq!(branch_label(26), "AA");
        assert_eq!(branch_label(27), "AB");
    }

    #[test]
    fn empty_network() {
        assert_eq!(Network::new().layout(), "");
    }

    #[test]
    fn linear_chain() {
        let mut net = Network::new();
        let src = net.add(Element::source("src")).unwrap();
        let tap = net.add(Element::tap("t")).unwrap();
        let sink = net.add(Element::sink("k")).unwrap();
        net.connect(src, tap).unwrap();
        net.connect(tap, sink).unwrap();
        assert_eq!(net.layout(), "[src]Source -> [t]Tap -> [k]Sink");
    }

    #[test]
    fn dangling_output() {
        let mut net = Network::new();
        let src = net.add(Element::source("src")).unwrap();
        let tap = net.add(Element::tap("t")).unwrap();
        net.connect(src, tap).unwrap();
        assert_eq!(net.layout(), "[src]Source -> [t]Tap -> *");
    }

    #[test]
    fn split_branches() {
        let mut net = Network::new();
        let src = net.add(Element::source("src")).unwrap();
        let sp = net.add(Element::split("sp")).unwrap();
        let a = net.add(Element::sink("a")).unwrap();
        let t = net.add(Element::tap("t")).unwrap();
        let b = net.add(Element::sink("b")).unwrap();
        net.connect(src, sp).unwrap();
        net.connect_at(sp, a, 0).unwrap();
        net.connect_at(sp, t, 1).unwrap();
        net.connect(t, b).unwrap();

        let indent = " ".repeat("[src]Source -> [sp]Split ".len());
        let expected = format!(
            "[src]Source -> [sp]Split +-A-> [a]Sink\n{indent}|\n{indent}+-B-> [t]Tap -> [b]Sink"
        );
        assert_eq!(net.layout(), expected);
    }

    #[test]
    fn nested_multisplit_with_open_slot() {
        let mut net = Network::new();
        let src = net.add(Element::source("s")).unwrap();
        let m = net.add(Element::multisplit("m", 3).unwrap()).unwrap();
        let a = net.add(Element::sink("a")).unwrap();
        let c = net.add(Element::sink("c")).unwrap();
        net.connect(src, m).unwrap();
        net.connect_at(m, a, 0).unwrap();
        net.connect_at(m, c, 2).unwrap();

        let layout = net.layout();
        let lines: Vec<&str> = layout.lines().collect();
        assert_eq!(lines[0], "[s]Source -> [m]Multisplit +-A-> [a]Sink");
        assert_eq!(lines[2].trim_start(), "+-B-> *");
        assert_eq!(lines[4].trim_start(), "+-C-> [c]Sink");
        assert_eq!(lines.len(), 5);
    }

    #[test]
    fn layout_from_subtree() {
        let mut net = Network::new();
        let src = net.add(Element::source("src")).unwrap();
        let tap = net.add(Element::tap("t")).unwrap();
        let sink = net.add(Element::sink("k")).unwrap();
        net.connect(src, tap).unwrap();
        net.connect(tap, sink).unwrap();
        assert_eq!(net.layout_from(tap), "[t]Tap -> [k]Sink");
        assert_eq!(net.layout_from(ElementId::try_from_index(9).unwrap()), "");
    }
}
