//! Best-effort presence probing.
//!
//! The host page materializes and tears down its markup on its own
//! schedule, so every lookup here treats absence as a normal answer.

use tracing::debug;

use crate::element::{Document, NodeId};

/// Stateless prober over an ordered list of selectors.
pub struct DomProbe;

impl DomProbe {
    /// Try each selector in order and return the first element found.
    ///
    /// Absence is `None`; a selector that fails to parse is skipped with a
    /// debug log instead of aborting the probe.
    pub fn find_any(doc: &Document, selectors: &[&str]) -> Option<NodeId> {
        for selector in selectors {
            match doc.query_selector(selector) {
                Ok(Some(node)) => return Some(node),
                Ok(None) => {}
                Err(err) => {
                    debug!(selector, error = %err, "Skipping unparsable probe selector");
                }
            }
        }
        None
    }

    /// True when at least one of the selectors matches.
    pub fn any_present(doc: &Document, selectors: &[&str]) -> bool {
        Self::find_any(doc, selectors).is_some()
    }
}
