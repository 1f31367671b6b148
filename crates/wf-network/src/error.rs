//! Network construction and validation errors.

use thiserror::Error;
use wf_core::{NodeId, SegId, WfError};
use wf_hydraulics::HydraulicsError;

/// Errors raised while building or validating a network topology.
#[derive(Error, Debug)]
pub enum NetworkError {
    #[error("Network must contain at least one node")]
    Empty,

    #[error("Expected {expected} segments for {nodes} nodes, found {found}")]
    SegmentCount {
        nodes: usize,
        expected: usize,
        found: usize,
    },

    #[error("Segment {segment} references unknown node {node}")]
    UnknownNode { segment: SegId, node: NodeId },

    #[error("Segment {segment} does not connect consecutive nodes")]
    NonSequential { segment: SegId },

    #[error("First node must be a wellhead boundary")]
    MissingWellhead,

    #[error("Duplicate wellhead boundary at node {node}")]
    DuplicateWellhead { node: NodeId },

    #[error("Duplicate node id {node}")]
    DuplicateNode { node: NodeId },

    #[error(transparent)]
    Geometry(#[from] HydraulicsError),
}

impl From<NetworkError> for WfError {
    fn from(e: NetworkError) -> Self {
        match e {
            NetworkError::Geometry(inner) => inner.into(),
            _ => WfError::InvalidArg {
                what: "network topology",
            },
        }
    }
}
