//! Segment and element values prior to rendering.

use crate::delimiters::Delimiters;

/// One data element: a simple value or a composite of components.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Element {
    Simple(String),
    Composite(Vec<String>),
}

impl Element {
    pub fn is_empty(&self) -> bool {
        match self {
            Element::Simple(value) => value.is_empty(),
            Element::Composite(components) => components.iter().all(String::is_empty),
        }
    }

    /// Value of a simple element.
    pub fn as_simple(&self) -> Option<&str> {
        match self {
            Element::Simple(value) => Some(value),
            Element::Composite(_) => None,
        }
    }

    fn render_into(&self, out: &mut String, delimiters: &Delimiters) {
        match self {
            Element::Simple(value) => out.push_str(value),
            Element::Composite(components) => {
                let used = components
                    .iter()
                    .rposition(|component| !component.is_empty())
                    .map_or(0, |last| last + 1);
                for (index, component) in components[..used].iter().enumerate() {
                    if index > 0 {
                        out.push(delimiters.component);
                    }
                    out.push_str(component);
                }
            }
        }
    }
}

/// An X12 segment: a two or three letter identifier plus positional elements.
///
/// Elements are appended in order; position 1 is the first element after the
/// identifier. Trailing empty elements are dropped when rendering unless the
/// segment is fixed-width (ISA).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Segment {
    id: &'static str,
    elements: Vec<Element>,
    fixed: bool,
}

impl Segment {
    pub fn new(id: &'static str) -> Self {
        Self {
            id,
            elements: Vec::new(),
            fixed: false,
        }
    }

    /// A segment that always renders every element, even empty ones.
    pub fn fixed(id: &'static str) -> Self {
        Self {
            fixed: true,
            ..Self::new(id)
        }
    }

    #[must_use]
    pub fn element(mut self, value: impl Into<String>) -> Self {
        self.elements.push(Element::Simple(value.into()));
        self
    }

    /// Append a value or an empty placeholder.
    #[must_use]
    pub fn optional(self, value: Option<impl Into<String>>) -> Self {
        match value {
            Some(value) => self.element(value),
            None => self.empty(1),
        }
    }

    /// Append `count` empty placeholders.
    #[must_use]
    pub fn empty(mut self, count: usize) -> Self {
        for _ in 0..count {
            self.elements.push(Element::Simple(String::new()));
        }
        self
    }

    #[must_use]
    pub fn composite<I, S>(mut self, components: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.elements.push(Element::Composite(
            components.into_iter().map(Into::into).collect(),
        ));
        self
    }

    pub fn id(&self) -> &'static str {
        self.id
    }

    pub fn elements(&self) -> &[Element] {
        &self.elements
    }

    /// Element at a 1-based X12 position (`SE01` is `element_at(1)`).
    pub fn element_at(&self, position: usize) -> Option<&Element> {
        position
            .checked_sub(1)
            .and_then(|index| self.elements.get(index))
    }

    /// Render without the segment terminator.
    pub fn render(&self, delimiters: &Delimiters) -> String {
        let mut out = String::with_capacity(self.id.len() + self.elements.len() * 8);
        self.render_into(&mut out, delimiters);
        out
    }

    pub(crate) fn render_into(&self, out: &mut String, delimiters: &Delimiters) {
        let used = if self.fixed {
            self.elements.len()
        } else {
            self.elements
                .iter()
                .rposition(|element| !element.is_empty())
                .map_or(0, |last| last + 1)
        };
        out.push_str(self.id);
        for element in &self.elements[..used] {
            out.push(delimiters.element);
            element.render_into(out, delimiters);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn trailing_empty_elements_are_dropped() {
        let segment = Segment::new("NM1")
            .element("PR")
            .element("2")
            .element("ACME")
            .empty(5);
        assert_eq!(segment.render(&Delimiters::default()), "NM1*PR*2*ACME");
    }

    #[test]
    fn inner_empty_elements_are_kept() {
        let segment = Segment::new("SBR")
            .element("P")
            .element("18")
            .empty(6)
            .element("CI");
        assert_eq!(segment.render(&Delimiters::default()), "SBR*P*18*******CI");
    }

    #[test]
    fn composite_trims_trailing_components() {
        let segment = Segment::new("SV1")
            .composite(["HC", "99213", "", ""])
            .element("150.00");
        assert_eq!(segment.render(&Delimiters::default()), "SV1*HC:99213*150.00");
    }

    #[test]
    fn fixed_segment_keeps_every_element() {
        let segment = Segment::fixed("XX").element("A").empty(2);
        assert_eq!(segment.render(&Delimiters::default()), "XX*A**");
    }

    #[test]
    fn element_positions_are_one_based() {
        let segment = Segment::new("SE").element("5").element("0001");
        assert_eq!(segment.element_at(1).and_then(Element::as_simple), Some("5"));
        assert_eq!(segment.element_at(2).and_then(Element::as_simple), Some("0001"));
        assert!(segment.element_at(0).is_none());
        assert!(segment.element_at(3).is_none());
    }
}
