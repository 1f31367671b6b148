//! Network topology: a validated, immutable chain of nodes and segments.

use crate::error::NetworkError;
use std::collections::HashSet;
use wf_core::NodeId;
use wf_hydraulics::SegmentSpec;
use wf_hydraulics::equipment::NodeKind;

/// A node in the surface network: identity plus its equipment kind.
#[derive(Debug, Clone)]
pub struct NodeSpec {
    pub id: NodeId,
    pub label: String,
    pub kind: NodeKind,
}

/// An ordered wellhead-to-outlet network.
///
/// Construction validates the topology once; the solver can then walk it
/// without re-checking references. Segment `i` connects node `i` to node
/// `i + 1`, so the solve order is the node order.
#[derive(Debug, Clone)]
pub struct Network {
    nodes: Vec<NodeSpec>,
    segments: Vec<SegmentSpec>,
}

impl Network {
    pub fn new(nodes: Vec<NodeSpec>, segments: Vec<SegmentSpec>) -> Result<Self, NetworkError> {
        if nodes.is_empty() {
            return Err(NetworkError::Empty);
        }

        let expected = nodes.len() - 1;
        if segments.len() != expected {
            return Err(NetworkError::SegmentCount {
                nodes: nodes.len(),
                expected,
                found: segments.len(),
            });
        }

        let mut seen = HashSet::new();
        for node in &nodes {
            if !seen.insert(node.id) {
                return Err(NetworkError::DuplicateNode { node: node.id });
            }
        }

        if !matches!(nodes[0].kind, NodeKind::Wellhead { .. }) {
            return Err(NetworkError::MissingWellhead);
        }
        for node in &nodes[1..] {
            if matches!(node.kind, NodeKind::Wellhead { .. }) {
                return Err(NetworkError::DuplicateWellhead { node: node.id });
            }
        }

        for (i, seg) in segments.iter().enumerate() {
            if !seen.contains(&seg.from) {
                return Err(NetworkError::UnknownNode {
                    segment: seg.id,
                    node: seg.from,
                });
            }
            if !seen.contains(&seg.to) {
                return Err(NetworkError::UnknownNode {
                    segment: seg.id,
                    node: seg.to,
                });
            }
            if seg.from != nodes[i].id || seg.to != nodes[i + 1].id {
                return Err(NetworkError::NonSequential { segment: seg.id });
            }
            seg.validate()?;
        }

        Ok(Self { nodes, segments })
    }

    pub fn nodes(&self) -> &[NodeSpec] {
        &self.nodes
    }

    pub fn segments(&self) -> &[SegmentSpec] {
        &self.segments
    }

    /// Wellhead boundary conditions of the first node.
    pub fn wellhead(&self) -> &NodeSpec {
        &self.nodes[0]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wf_core::Id;
    use wf_core::units::{k, kpa, m, m3ps};

    fn wellhead_node(idx: u32) -> NodeSpec {
        NodeSpec {
            id: Id::from_index(idx),
            label: "WH".into(),
            kind: NodeKind::Wellhead {
                pressure: kpa(5_000.0),
                temperature: k(333.0),
                flow_rate: m3ps(0.1),
            },
        }
    }

    fn outlet_node(idx: u32) -> NodeSpec {
        NodeSpec {
            id: Id::from_index(idx),
            label: "ESD".into(),
            kind: NodeKind::Esd(wf_hydraulics::equipment::LossModel::KFactor(0.5)),
        }
    }

    fn segment(idx: u32, from: u32, to: u32) -> SegmentSpec {
        SegmentSpec {
            id: Id::from_index(idx),
            from: Id::from_index(from),
            to: Id::from_index(to),
            length: m(10.0),
            inner_diameter: m(0.1),
            roughness: m(4.5e-5),
            k_fittings: 0.0,
            elevation_change: m(0.0),
        }
    }

    #[test]
    fn builds_valid_chain() {
        let net = Network::new(
            vec![wellhead_node(0), outlet_node(1)],
            vec![segment(0, 0, 1)],
        )
        .unwrap();
        assert_eq!(net.nodes().len(), 2);
        assert_eq!(net.segments().len(), 1);
    }

    #[test]
    fn rejects_empty() {
        assert!(matches!(
            Network::new(vec![], vec![]),
            Err(NetworkError::Empty)
        ));
    }

    #[test]
    fn rejects_dangling_segment_ref() {
        let err = Network::new(
            vec![wellhead_node(0), outlet_node(1)],
            vec![segment(0, 0, 7)],
        )
        .unwrap_err();
        assert!(matches!(err, NetworkError::UnknownNode { .. }));
    }

    #[test]
    fn rejects_segment_count_mismatch() {
        let err = Network::new(vec![wellhead_node(0), outlet_node(1)], vec![]).unwrap_err();
        assert!(matches!(err, NetworkError::SegmentCount { .. }));
    }

    #[test]
    fn rejects_missing_wellhead() {
        let err = Network::new(vec![outlet_node(0)], vec![]).unwrap_err();
        assert!(matches!(err, NetworkError::MissingWellhead));
    }

    #[test]
    fn rejects_bad_geometry() {
        let mut seg = segment(0, 0, 1);
        seg.length = m(-5.0);
        let err = Network::new(vec![wellhead_node(0), outlet_node(1)], vec![seg]).unwrap_err();
        assert!(matches!(err, NetworkError::Geometry(_)));
    }
}
