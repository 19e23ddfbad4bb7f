//! Balancing unequal supply and demand with a dummy node.
//!
//! A min-cost-flow instance needs total supply equal to total demand.  When
//! they differ, a copy of the network gets one extra node carrying the
//! difference:
//!
//! | Instance      | Dummy supply    | Dummy arcs                       |
//! |---------------|-----------------|----------------------------------|
//! | `Balanced`    | none            | none                             |
//! | `ExtraSupply` | `-(S - D)` sink | every supply node → dummy        |
//! | `ExtraDemand` | `D - S` source  | dummy → every demand node        |
//!
//! Dummy arcs cost 0 and are uncapacitated.  Node and arc ids of the input
//! are preserved; the dummy node and its arcs come after them.

use nf_core::{ExtId, FlowInstanceType, NodeId};

use crate::{ArcData, InternalNet, InternalNetBuilder};

/// A balanced copy of a network.
pub struct BalancedNet {
    pub net:       InternalNet,
    pub instance:  FlowInstanceType,
    /// The added node, if the input was unbalanced.
    pub dummy:     Option<NodeId>,
    /// Arc count of the input; arcs at or above this id are dummy arcs.
    pub real_arcs: usize,
}

impl BalancedNet {
    /// `true` if `arc` (by index) existed in the input network.
    #[inline]
    pub fn is_real_arc(&self, arc: usize) -> bool {
        arc < self.real_arcs
    }
}

impl InternalNet {
    /// Copy this network, adding a dummy node if supply and demand differ.
    pub fn balanced(&self) -> BalancedNet {
        let instance = self.instance_type();
        let real_arcs = self.arc_count();
        if instance == FlowInstanceType::Balanced {
            return BalancedNet { net: self.clone(), instance, dummy: None, real_arcs };
        }

        let mut b = InternalNetBuilder::with_capacity(self.node_count() + 1, real_arcs + self.node_count());
        for node in self.nodes() {
            let ext = self.node_ext_id(node).clone();
            match self.node_position(node) {
                Some(pos) => b.add_node_at(ext, self.supply(node), pos),
                None => b.add_node(ext, self.supply(node)),
            };
        }
        for arc in self.arcs() {
            b.add_arc(self.arc_source(arc), self.arc_target(arc), self.arc_data(arc));
        }

        let diff = self.total_supply() - self.total_demand();
        let dummy = b.add_node(self.unused_node_id("dummy"), -diff);
        for node in self.nodes() {
            let s = self.supply(node);
            match instance {
                FlowInstanceType::ExtraSupply if s > 0.0 => b.add_arc(node, dummy, ArcData::new(0.0)),
                FlowInstanceType::ExtraDemand if s < 0.0 => b.add_arc(dummy, node, ArcData::new(0.0)),
                _ => {}
            }
        }

        let mut net = b.assemble();
        net.splits = self.splits.clone();
        net.swapped = self.swapped.clone();
        net.split_origins = self.split_origins.clone();
        BalancedNet { net, instance, dummy: Some(dummy), real_arcs }
    }

    /// An external node id starting with `base` that no node uses yet.
    pub fn unused_node_id(&self, base: &str) -> ExtId {
        let mut candidate = format!("__{base}");
        while self.node_index.contains_key(candidate.as_str()) {
            candidate.push('_');
        }
        ExtId::from(candidate)
    }
}
