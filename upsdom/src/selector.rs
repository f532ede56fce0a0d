use crate::element::{DocumentInner, NodeId};
use crate::errors::DomError;

/// A parsed selector.
///
/// Covers the subset the host page contract actually uses:
/// - simple selectors: `tag`, `#id`, `.class`, and combinations
///   (`button#save.primary`),
/// - descendant chains separated by whitespace
///   (`#aiUpscalerButton .upscaler-status`),
/// - selector groups separated by commas
///   (`.videoOsdBottom, .osdControls`).
#[derive(Clone, Debug)]
pub struct Selector {
    groups: Vec<Vec<SimpleSelector>>,
}

#[derive(Clone, Debug, Default)]
struct SimpleSelector {
    tag: Option<String>,
    id: Option<String>,
    classes: Vec<String>,
}

fn take_name(chars: &mut std::iter::Peekable<std::str::Chars<'_>>) -> String {
    let mut name = String::new();
    while let Some(c) = chars.peek() {
        if c.is_alphanumeric() || *c == '-' || *c == '_' {
            name.push(*c);
            chars.next();
        } else {
            break;
        }
    }
    name
}

impl SimpleSelector {
    fn parse(input: &str) -> Result<Self, DomError> {
        let mut simple = SimpleSelector::default();
        let mut chars = input.chars().peekable();

        // Leading tag name, if any.
        if chars.peek().is_some_and(|c| c.is_alphanumeric()) {
            simple.tag = Some(take_name(&mut chars));
        }

        while let Some(marker) = chars.next() {
            let name = take_name(&mut chars);
            if name.is_empty() {
                return Err(DomError::InvalidSelector(input.to_string()));
            }
            match marker {
                '#' => {
                    if simple.id.is_some() {
                        return Err(DomError::InvalidSelector(input.to_string()));
                    }
                    simple.id = Some(name);
                }
                '.' => simple.classes.push(name),
                _ => return Err(DomError::InvalidSelector(input.to_string())),
            }
        }

        if simple.tag.is_none() && simple.id.is_none() && simple.classes.is_empty() {
            return Err(DomError::InvalidSelector(input.to_string()));
        }
        Ok(simple)
    }

    fn matches(&self, doc: &DocumentInner, node: NodeId) -> bool {
        let Some(data) = doc.nodes.get(&node) else {
            return false;
        };
        if let Some(tag) = &self.tag {
            if data.tag != *tag {
                return false;
            }
        }
        if let Some(id) = &self.id {
            if data.id.as_deref() != Some(id.as_str()) {
                return false;
            }
        }
        self.classes.iter().all(|class| data.classes.contains(class))
    }
}

impl Selector {
    pub fn parse(input: &str) -> Result<Self, DomError> {
        let mut groups = Vec::new();
        for group in input.split(',') {
            let group = group.trim();
            if group.is_empty() {
                return Err(DomError::InvalidSelector(input.to_string()));
            }
            let chain = group
                .split_whitespace()
                .map(SimpleSelector::parse)
                .collect::<Result<Vec<_>, _>>()?;
            groups.push(chain);
        }
        if groups.is_empty() {
            return Err(DomError::InvalidSelector(input.to_string()));
        }
        Ok(Self { groups })
    }

    /// True when `node` matches any group of the selector.
    pub(crate) fn matches(&self, doc: &DocumentInner, node: NodeId) -> bool {
        self.groups
            .iter()
            .any(|chain| Self::matches_chain(chain, doc, node))
    }

    /// Descendant matching: the last simple selector must match the node
    /// itself, every earlier one must match some strictly higher ancestor,
    /// in order.
    fn matches_chain(chain: &[SimpleSelector], doc: &DocumentInner, node: NodeId) -> bool {
        let Some((last, rest)) = chain.split_last() else {
            return false;
        };
        if !last.matches(doc, node) {
            return false;
        }

        let mut remaining = rest;
        let mut current = node;
        while let Some((next, earlier)) = remaining.split_last() {
            let mut ancestor = doc.nodes.get(&current).and_then(|data| data.parent);
            loop {
                match ancestor {
                    None => return false,
                    Some(candidate) => {
                        if next.matches(doc, candidate) {
                            current = candidate;
                            remaining = earlier;
                            break;
                        }
                        ancestor = doc.nodes.get(&candidate).and_then(|data| data.parent);
                    }
                }
            }
        }
        true
    }
}
