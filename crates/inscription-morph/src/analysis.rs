//! Minimal element tree for morphological analysis payloads.
//!
//! Payloads are small XML fragments. Only element names, leading text and
//! child order matter; attributes, comments and declarations are ignored.

use quick_xml::events::Event;
use quick_xml::reader::Reader;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AnalysisError {
    #[error("analysis payload is empty")]
    Empty,
    #[error("malformed xml: {0}")]
    Xml(#[from] quick_xml::Error),
    #[error("invalid escape in text: {0}")]
    Escape(String),
    #[error("closing tag without matching opening tag")]
    UnbalancedEnd,
    #[error("{0} element(s) left unclosed")]
    Unclosed(usize),
    #[error("content after the root element")]
    TrailingContent,
    #[error("text outside the root element")]
    StrayText,
}

impl AnalysisError {
    /// An empty payload means "no analysis", not a malformed one.
    pub fn is_empty_payload(&self) -> bool {
        matches!(self, AnalysisError::Empty)
    }
}

/// Outcome of parsing one payload.
#[derive(Debug)]
pub enum Analysis {
    Parsed(Element),
    Unparseable(AnalysisError),
}

impl Analysis {
    pub fn parse(raw: &str) -> Self {
        match Element::parse(raw) {
            Ok(root) => Analysis::Parsed(root),
            Err(err) => Analysis::Unparseable(err),
        }
    }
}

#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct Element {
    pub name: String,
    /// Text preceding the first child element.
    pub text: String,
    pub children: Vec<Element>,
}

impl Element {
    fn named(name: &[u8]) -> Self {
        Self {
            name: String::from_utf8_lossy(name).into_owned(),
            ..Self::default()
        }
    }

    /// Parse a single-rooted XML fragment.
    pub fn parse(raw: &str) -> Result<Self, AnalysisError> {
        if raw.trim().is_empty() {
            return Err(AnalysisError::Empty);
        }

        let mut reader = Reader::from_str(raw);
        let mut stack: Vec<Element> = Vec::new();
        let mut root: Option<Element> = None;

        loop {
            match reader.read_event()? {
                Event::Start(start) => {
                    if stack.is_empty() && root.is_some() {
                        return Err(AnalysisError::TrailingContent);
                    }
                    stack.push(Element::named(start.name().as_ref()));
                }
                Event::Empty(start) => {
                    if stack.is_empty() && root.is_some() {
                        return Err(AnalysisError::TrailingContent);
                    }
                    attach(&mut stack, &mut root, Element::named(start.name().as_ref()));
                }
                Event::End(_) => {
                    let element = stack.pop().ok_or(AnalysisError::UnbalancedEnd)?;
                    attach(&mut stack, &mut root, element);
                }
                Event::Text(text) => {
                    let text = text
                        .unescape()
                        .map_err(|e| AnalysisError::Escape(e.to_string()))?;
                    push_text(&mut stack, &text)?;
                }
                Event::CData(data) => push_text(&mut stack, &String::from_utf8_lossy(&data))?,
                Event::Eof => break,
                _ => {}
            }
        }

        if !stack.is_empty() {
            return Err(AnalysisError::Unclosed(stack.len()));
        }
        root.ok_or(AnalysisError::Empty)
    }

    /// First direct child with the given name.
    pub fn child(&self, name: &str) -> Option<&Element> {
        self.children.iter().find(|c| c.name == name)
    }

    /// Text of the first direct child with the given name, if non-empty.
    pub fn child_text(&self, name: &str) -> Option<&str> {
        self.child(name)
            .map(|c| c.text.as_str())
            .filter(|t| !t.is_empty())
    }

    /// All descendants reached by following `path` one child level per step,
    /// in document order.
    pub fn find_all<'a>(&'a self, path: &[&str]) -> Vec<&'a Element> {
        let mut current = vec![self];
        for step in path {
            current = current
                .into_iter()
                .flat_map(|el| el.children.iter().filter(move |c| c.name == *step))
                .collect();
            if current.is_empty() {
                break;
            }
        }
        current
    }
}

fn attach(stack: &mut [Element], root: &mut Option<Element>, element: Element) {
    match stack.last_mut() {
        Some(parent) => parent.children.push(element),
        None => *root = Some(element),
    }
}

fn push_text(stack: &mut [Element], text: &str) -> Result<(), AnalysisError> {
    match stack.last_mut() {
        Some(top) => {
            if top.children.is_empty() {
                top.text.push_str(text);
            }
            Ok(())
        }
        None if text.trim().is_empty() => Ok(()),
        None => Err(AnalysisError::StrayText),
    }
}
