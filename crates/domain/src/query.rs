use super::dnsifier::logical_labels;
use super::name::{Component, Name, SERVICE_COMPONENT};
use super::record::RecordSetMessage;
use super::{DomainError, RecordType};
use std::fmt;

/// What a raw query is known to ask for
///
/// Callers that built the query from its parts pass them explicitly;
/// otherwise they are recovered from the query name, which must have the
/// canonical `<zone>/DNS/<label…>/<TYPE>` shape.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QueryTarget {
    Explicit {
        zone: Name,
        label: Name,
        record_type: RecordType,
    },
    Inferred,
}

impl QueryTarget {
    /// Canonical shape of `query` under this target
    pub fn resolve(&self, query: &Name) -> Result<QueryShape, DomainError> {
        match self {
            QueryTarget::Explicit {
                zone,
                label,
                record_type,
            } => Ok(QueryShape {
                zone: zone.clone(),
                label: label.clone(),
                record_type: *record_type,
            }),
            QueryTarget::Inferred => QueryShape::infer(query),
        }
    }

    /// Record type without requiring the full shape: explicit, or the last
    /// non-version component of the query
    pub fn record_type(&self, query: &Name) -> Option<RecordType> {
        match self {
            QueryTarget::Explicit { record_type, .. } => Some(*record_type),
            QueryTarget::Inferred => query
                .last_non_version()
                .and_then(Component::as_str)
                .and_then(|text| text.parse().ok()),
        }
    }
}

/// Zone, label and type of a single-record query
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueryShape {
    pub zone: Name,
    pub label: Name,
    pub record_type: RecordType,
}

impl QueryShape {
    pub fn new(zone: Name, label: Name, record_type: RecordType) -> Self {
        Self {
            zone,
            label,
            record_type,
        }
    }

    /// `<zone>/DNS/<label…>/<TYPE>`
    pub fn query_name(&self) -> Name {
        self.zone
            .clone()
            .append(SERVICE_COMPONENT)
            .append_name(&self.label)
            .append(self.record_type.as_str())
    }

    fn infer(query: &Name) -> Result<Self, DomainError> {
        let malformed = || DomainError::MalformedQuery(query.to_string());

        let bare = query.without_version();
        let type_index = bare.len().checked_sub(1).ok_or_else(malformed)?;
        let record_type: RecordType = bare
            .get(type_index)
            .and_then(Component::as_str)
            .and_then(|text| text.parse().ok())
            .ok_or_else(malformed)?;

        // the last service marker before the type separates zone and label
        let marker = bare.components()[..type_index]
            .iter()
            .rposition(Component::is_service_marker)
            .ok_or_else(malformed)?;

        Ok(Self {
            zone: bare.prefix(marker),
            label: Name::from_components(
                bare.components()[marker + 1..type_index].iter().cloned(),
            ),
            record_type,
        })
    }
}

/// Mutable state of one in-flight iterative resolution
///
/// `label_logical` is the dns-ified form used for NS probes; `label_real`
/// keeps the native components and is what the zone advances by.
#[derive(Debug, Clone)]
pub struct ResolutionState {
    name: Name,
    cursor: usize,
    pub zone: Name,
    pub hint: Option<Name>,
    pub label_logical: Name,
    pub label_real: Name,
}

impl ResolutionState {
    pub fn new(name: Name) -> Self {
        Self {
            name,
            cursor: 0,
            zone: Name::root(),
            hint: None,
            label_logical: Name::root(),
            label_real: Name::root(),
        }
    }

    /// Resolution of `name` starting from an already known zone and hint
    pub fn starting_at(name: Name, zone: Name, hint: Option<Name>) -> Self {
        let cursor = if zone.is_prefix_of(&name) { zone.len() } else { 0 };
        Self {
            name,
            cursor,
            zone,
            hint,
            label_logical: Name::root(),
            label_real: Name::root(),
        }
    }

    pub fn name(&self) -> &Name {
        &self.name
    }

    pub fn remaining(&self) -> usize {
        self.name.len() - self.cursor
    }

    pub fn next_component(&mut self) -> Option<Component> {
        let component = self.name.get(self.cursor).cloned()?;
        self.cursor += 1;
        Some(component)
    }

    /// Start a new label with one component
    pub fn begin_label(&mut self, component: Component) -> Result<(), DomainError> {
        self.label_logical = logical_labels(&component)?;
        self.label_real = Name::root().append(component);
        Ok(())
    }

    /// Grow the current label by one more component
    pub fn extend_label(&mut self, component: Component) -> Result<(), DomainError> {
        let logical = logical_labels(&component)?;
        self.label_logical = std::mem::take(&mut self.label_logical).append_name(&logical);
        self.label_real = std::mem::take(&mut self.label_real).append(component);
        Ok(())
    }

    /// Zone cut found: move the real label into the zone and switch hints
    pub fn delegate(&mut self, hint: Name) {
        let label = std::mem::take(&mut self.label_real);
        self.zone = std::mem::take(&mut self.zone).append_name(&label);
        self.label_logical = Name::root();
        self.hint = Some(hint);
    }

    /// Append all unconsumed components to the real label
    pub fn consume_remaining(&mut self) {
        while let Some(component) = self.next_component() {
            self.label_real.push(component);
        }
    }

    pub fn to_partial(&self, answer: Option<RecordSetMessage>) -> PartialResolution {
        PartialResolution {
            zone: self.zone.clone(),
            hint: self.hint.clone(),
            label: self.label_real.clone(),
            answer,
        }
    }
}

/// Where a resolution stopped, for diagnostics
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PartialResolution {
    pub zone: Name,
    pub hint: Option<Name>,
    pub label: Name,
    pub answer: Option<RecordSetMessage>,
}

impl fmt::Display for PartialResolution {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "zone [{}], label [{}]", self.zone, self.label)?;
        if let Some(hint) = &self.hint {
            write!(f, ", hint [{}]", hint)?;
        }
        Ok(())
    }
}
