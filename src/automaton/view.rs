use std::collections::BTreeMap;
use std::fmt;

use itertools::Itertools;
use petgraph::dot::Dot;
use petgraph::graph::DiGraph;

use super::{Nfa, State, StateID};

/// Byte lists longer than this are summarised in edge labels.
const MAX_LABEL_BYTES: usize = 8;

/// Edge weight of the rendered automaton.
enum Edge {
    Bytes(Vec<u8>),
    Fail,
}

impl fmt::Display for Edge {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Edge::Bytes(bytes) if bytes.len() > MAX_LABEL_BYTES => {
                write!(f, "{} bytes", bytes.len())
            }
            Edge::Bytes(bytes) => write!(
                f,
                "{}",
                bytes
                    .iter()
                    .map(|&b| std::ascii::escape_default(b).to_string())
                    .join(" ")
            ),
            Edge::Fail => write!(f, "FAIL"),
        }
    }
}

impl Nfa {
    /// Get its dot string representation
    ///
    /// Transitions into the same state are merged into one edge labelled with
    /// their bytes. Self-loops of the start and dead states and failure links
    /// to the start state are omitted.
    pub fn dot_string(&self) -> String {
        let mut graph = DiGraph::new();
        let nodes = self
            .states()
            .map(|(id, state)| graph.add_node(fmt_node(id, state)))
            .collect_vec();

        for (id, state) in self.states() {
            let mut targets: BTreeMap<StateID, Vec<u8>> = BTreeMap::new();
            for (byte, next) in state.transitions() {
                let is_loop = next == id && (id == StateID::START || id == StateID::DEAD);
                if !is_loop {
                    targets.entry(next).or_default().push(byte);
                }
            }
            for (next, bytes) in targets {
                graph.add_edge(nodes[id.0], nodes[next.0], Edge::Bytes(bytes));
            }
            let failed = state.failure();
            if failed != StateID::START && id != StateID::START {
                graph.add_edge(nodes[id.0], nodes[failed.0], Edge::Fail);
            }
        }
        format!("{}", Dot::new(&graph))
    }
}

fn fmt_node(id: StateID, state: &State) -> String {
    let name = match id {
        StateID::START => "start".to_string(),
        StateID::DEAD => "dead".to_string(),
        id => id.to_string(),
    };
    if state.is_match() {
        format!("{name} [{}]", state.matches().iter().join(", "))
    } else {
        name
    }
}

#[cfg(test)]
mod tests {
    use crate::automaton::{MatchKind, Nfa};

    #[test]
    fn dot_edges() {
        let nfa = Nfa::new(["he", "she"], MatchKind::Standard, false);
        let dot = nfa.dot_string();
        assert!(dot.starts_with("digraph {"));
        assert!(dot.contains("\"start\""));
        assert!(dot.contains("\"dead\""));
        assert!(dot.contains("\"6 [0, 1]\""));
        assert!(dot.contains("\"FAIL\""));
        assert!(dot.contains("\"h\""));
        // Start and dead self-loops are left out
        assert!(!dot.contains("bytes"));
    }

    #[test]
    fn closed_start_loop_is_summarised() {
        let nfa = Nfa::new([""], MatchKind::LeftmostFirst, false);
        let dot = nfa.dot_string();
        assert!(dot.contains("\"256 bytes\""));
    }
}
