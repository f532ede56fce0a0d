use thiserror::Error;

use crate::element::NodeId;

#[derive(Error, Debug)]
pub enum DomError {
    #[error("Invalid selector '{0}'")]
    InvalidSelector(String),
    #[error("Unknown node {0:?}")]
    UnknownNode(NodeId),
    #[error("Node {0:?} is already attached")]
    AlreadyAttached(NodeId),
}
