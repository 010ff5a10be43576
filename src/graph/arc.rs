use crate::common::{NodeId, Weight};

/// Directed weighted edge. The target is a slot index into the owning graph.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Arc {
    target: NodeId,
    weight: Weight,
}

impl Arc {
    pub(crate) fn new(target: NodeId, weight: Weight) -> Self {
        Arc { target, weight }
    }

    pub fn target(&self) -> NodeId {
        self.target
    }

    pub fn weight(&self) -> Weight {
        self.weight
    }
}
