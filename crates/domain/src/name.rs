use super::DomainError;
use bytes::Bytes;
use std::fmt;
use std::str::FromStr;

/// First byte of a version/sequence component (`%FD...`)
pub const VERSION_MARKER: u8 = 0xFD;

/// Single byte of the component that separates a forwarding hint from the
/// real query name on the wire (`<hint>/%F0./<query>`)
pub const ESCAPE_MARKER: u8 = 0xF0;

/// Component that separates an authority zone from the labels it serves
pub const SERVICE_COMPONENT: &str = "DNS";

/// One opaque name component
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct Component(Bytes);

impl Component {
    pub fn new(value: impl Into<Bytes>) -> Self {
        Self(value.into())
    }

    pub fn from_text(value: &str) -> Self {
        Self(Bytes::copy_from_slice(value.as_bytes()))
    }

    /// The reserved escape component
    pub fn escape() -> Self {
        Self(Bytes::from_static(&[ESCAPE_MARKER]))
    }

    /// Version component: marker byte followed by the big-endian value
    /// without leading zero bytes
    pub fn version(value: u64) -> Self {
        let be = value.to_be_bytes();
        let skip = be.iter().take_while(|b| **b == 0).count().min(7);
        let mut bytes = Vec::with_capacity(1 + be.len() - skip);
        bytes.push(VERSION_MARKER);
        bytes.extend_from_slice(&be[skip..]);
        Self(Bytes::from(bytes))
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn is_escape(&self) -> bool {
        self.0.as_ref() == [ESCAPE_MARKER]
    }

    pub fn is_version(&self) -> bool {
        self.0.first() == Some(&VERSION_MARKER)
    }

    pub fn to_version(&self) -> Option<u64> {
        if !self.is_version() || self.0.len() > 9 {
            return None;
        }
        Some(
            self.0[1..]
                .iter()
                .fold(0u64, |acc, b| (acc << 8) | u64::from(*b)),
        )
    }

    pub fn is_service_marker(&self) -> bool {
        self.0.as_ref() == SERVICE_COMPONENT.as_bytes()
    }

    /// Component bytes as UTF-8 text, if they are valid UTF-8
    pub fn as_str(&self) -> Option<&str> {
        std::str::from_utf8(&self.0).ok()
    }

    fn parse_uri(segment: &str) -> Result<Self, DomainError> {
        let decoded = percent_decode(segment)?;
        // "..." prefixes a component made only of periods
        if !decoded.is_empty() && decoded.iter().all(|b| *b == b'.') {
            if decoded.len() < 3 {
                return Err(DomainError::InvalidName(format!(
                    "illegal component [{}]",
                    segment
                )));
            }
            return Ok(Self(Bytes::from(decoded[3..].to_vec())));
        }
        Ok(Self(Bytes::from(decoded)))
    }
}

impl fmt::Display for Component {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0.iter().all(|b| *b == b'.') {
            f.write_str("...")?;
        }
        for b in self.0.iter() {
            if b.is_ascii_alphanumeric() || matches!(b, b'-' | b'.' | b'_' | b'~') {
                write!(f, "{}", *b as char)?;
            } else {
                write!(f, "%{:02X}", b)?;
            }
        }
        Ok(())
    }
}

impl fmt::Debug for Component {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Component({})", self)
    }
}

impl From<&str> for Component {
    fn from(value: &str) -> Self {
        Self::from_text(value)
    }
}

/// Hierarchical name made of opaque components, in network order
///
/// Equality and prefix relations are component-wise. The textual form is
/// the slash-delimited URI (`/ndn/ucla.edu/DNS/www/A`), with bytes outside
/// the unreserved set percent-encoded.
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct Name {
    components: Vec<Component>,
}

impl Name {
    pub fn root() -> Self {
        Self::default()
    }

    pub fn from_components(components: impl IntoIterator<Item = Component>) -> Self {
        Self {
            components: components.into_iter().collect(),
        }
    }

    /// Parse a name URI; `ndn:` and `ccnx:` schemes are accepted
    pub fn parse(uri: &str) -> Result<Self, DomainError> {
        let trimmed = uri.trim();
        let lower = trimmed.to_ascii_lowercase();
        let path = if lower.starts_with("ndn:") {
            &trimmed[4..]
        } else if lower.starts_with("ccnx:") {
            &trimmed[5..]
        } else {
            trimmed
        };

        if !path.starts_with('/') {
            return Err(DomainError::InvalidName(format!(
                "[{}] is not a valid name (must start with '/')",
                uri
            )));
        }

        let components = path
            .split('/')
            .filter(|segment| !segment.is_empty())
            .map(Component::parse_uri)
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self { components })
    }

    pub fn len(&self) -> usize {
        self.components.len()
    }

    pub fn is_empty(&self) -> bool {
        self.components.is_empty()
    }

    pub fn is_root(&self) -> bool {
        self.components.is_empty()
    }

    pub fn components(&self) -> &[Component] {
        &self.components
    }

    pub fn get(&self, index: usize) -> Option<&Component> {
        self.components.get(index)
    }

    pub fn last(&self) -> Option<&Component> {
        self.components.last()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Component> {
        self.components.iter()
    }

    pub fn push(&mut self, component: Component) {
        self.components.push(component);
    }

    pub fn append(mut self, component: impl Into<Component>) -> Self {
        self.components.push(component.into());
        self
    }

    pub fn append_name(mut self, other: &Name) -> Self {
        self.components.extend(other.components.iter().cloned());
        self
    }

    pub fn append_version(self, version: u64) -> Self {
        self.append(Component::version(version))
    }

    /// The first `len` components
    pub fn prefix(&self, len: usize) -> Name {
        let len = len.min(self.components.len());
        Name::from_components(self.components[..len].iter().cloned())
    }

    /// Components from `start` to the end
    pub fn sub_name(&self, start: usize) -> Name {
        let start = start.min(self.components.len());
        Name::from_components(self.components[start..].iter().cloned())
    }

    pub fn is_prefix_of(&self, other: &Name) -> bool {
        self.components.len() <= other.components.len()
            && self.components[..] == other.components[..self.components.len()]
    }

    /// Index of the first component equal to the service marker
    pub fn service_marker_position(&self) -> Option<usize> {
        self.components.iter().position(Component::is_service_marker)
    }

    /// Last component that is not a version marker
    pub fn last_non_version(&self) -> Option<&Component> {
        self.components.iter().rev().find(|c| !c.is_version())
    }

    /// The name without a trailing version component
    pub fn without_version(&self) -> Name {
        match self.components.last() {
            Some(last) if last.is_version() => self.prefix(self.components.len() - 1),
            _ => self.clone(),
        }
    }

    /// `hint ∥ ESCAPE ∥ query`
    pub fn encapsulate(hint: &Name, query: &Name) -> Name {
        hint.clone().append(Component::escape()).append_name(query)
    }

    /// Split a hint-encapsulated name back into `(hint, query)`
    pub fn split_encapsulated(&self) -> Option<(Name, Name)> {
        let position = self.components.iter().position(Component::is_escape)?;
        Some((self.prefix(position), self.sub_name(position + 1)))
    }
}

impl fmt::Display for Name {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.components.is_empty() {
            return f.write_str("/");
        }
        for component in &self.components {
            write!(f, "/{}", component)?;
        }
        Ok(())
    }
}

impl fmt::Debug for Name {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Name({})", self)
    }
}

impl FromStr for Name {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Name::parse(s)
    }
}

impl<'a> IntoIterator for &'a Name {
    type Item = &'a Component;
    type IntoIter = std::slice::Iter<'a, Component>;

    fn into_iter(self) -> Self::IntoIter {
        self.components.iter()
    }
}

fn percent_decode(segment: &str) -> Result<Vec<u8>, DomainError> {
    let bytes = segment.as_bytes();
    let mut out = Vec::with_capacity(bytes.len());
    let mut i = 0;
    while i < bytes.len() {
        if bytes[i] == b'%' {
            let hex = bytes
                .get(i + 1..i + 3)
                .and_then(|h| std::str::from_utf8(h).ok())
                .and_then(|h| u8::from_str_radix(h, 16).ok())
                .ok_or_else(|| {
                    DomainError::InvalidName(format!("bad percent-encoding in [{}]", segment))
                })?;
            out.push(hex);
            i += 3;
        } else {
            out.push(bytes[i]);
            i += 1;
        }
    }
    Ok(out)
}
