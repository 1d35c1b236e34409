//! Path tracking for diagnostic labels.

use std::fmt;

/// One step of the path from the compared root to the current value.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Segment {
    /// A record field, by name.
    Field(String),
    /// A position in a growable sequence: `[i]`.
    Index(usize),
    /// A position in a fixed array: `array[i]`.
    ArrayIndex(usize),
    /// A map key, already rendered: `map[k]`.
    Key(String),
    /// Marker for a type mismatch: `<type>`.
    Type,
    /// Marker for a length mismatch: `<len>`.
    Len,
    /// Marker for an unmatched element of an unordered scalar sequence.
    Item,
    /// The field names an unordered record match was keyed on.
    Identifier(String),
}

impl fmt::Display for Segment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Field(name) => f.write_str(name),
            Self::Index(i) => write!(f, "[{i}]"),
            Self::ArrayIndex(i) => write!(f, "array[{i}]"),
            Self::Key(key) => write!(f, "map[{key}]"),
            Self::Type => f.write_str("<type>"),
            Self::Len => f.write_str("<len>"),
            Self::Item => f.write_str("item"),
            Self::Identifier(fields) => f.write_str(fields),
        }
    }
}

/// Stack of segments. Used only to label diagnostics, never for lookup.
#[derive(Clone, Debug, Default)]
pub struct Path {
    segments: Vec<Segment>,
}

impl Path {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, segment: Segment) {
        self.segments.push(segment);
    }

    pub fn pop(&mut self) -> Option<Segment> {
        self.segments.pop()
    }

    pub fn depth(&self) -> usize {
        self.segments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }
}

/// Dot-joined rendering, e.g. `Body.Legs.[1].Name`.
impl fmt::Display for Path {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, segment) in self.segments.iter().enumerate() {
            if i > 0 {
                f.write_str(".")?;
            }
            write!(f, "{segment}")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn renders_dot_joined() {
        let mut path = Path::new();
        path.push(Segment::Field("Body".into()));
        path.push(Segment::Field("Legs".into()));
        path.push(Segment::Index(1));
        path.push(Segment::Field("Name".into()));
        assert_eq!(path.to_string(), "Body.Legs.[1].Name");
    }

    #[test]
    fn markers() {
        let mut path = Path::new();
        path.push(Segment::Key("1+1".into()));
        path.push(Segment::ArrayIndex(0));
        path.push(Segment::Type);
        assert_eq!(path.to_string(), "map[1+1].array[0].<type>");
    }

    #[test]
    fn push_pop_balance() {
        let mut path = Path::new();
        assert!(path.is_empty());
        path.push(Segment::Len);
        assert_eq!(path.depth(), 1);
        assert_eq!(path.pop(), Some(Segment::Len));
        assert_eq!(path.pop(), None);
        assert_eq!(path.to_string(), "");
    }
}
