use super::caching::CachingQuery;
use super::QueryOptions;
use ndns_application::ports::Resolution;
use ndns_domain::{
    relative_label, DomainError, Name, QueryShape, RecordData, RecordSetMessage, RecordType,
    ResolutionState,
};
use tracing::{debug, trace};

/// Zone cut and forwarding hint discovery for one name
///
/// Starting at the root, each step probes `<zone>/DNS/<label>/NS`. A
/// delegation marker (empty answer plus one `NDNAUTH` authority set) means
/// the cut lies deeper, so the label grows by one component and the probe
/// is repeated. An NS answer names the child zone's server, whose `FH`
/// record becomes the hint for everything below. Any other answer ends
/// discovery and the remaining components form the final label.
pub struct IterativeQuery<'a> {
    caching: &'a CachingQuery,
    options: QueryOptions,
}

impl<'a> IterativeQuery<'a> {
    pub fn new(caching: &'a CachingQuery, options: QueryOptions) -> Self {
        Self { caching, options }
    }

    pub async fn resolve(
        &self,
        name: &Name,
        record_type: RecordType,
    ) -> Result<Resolution, DomainError> {
        let mut state = ResolutionState::new(name.clone());
        let mut last_ns: Option<Resolution> = None;
        let mut last_fh: Option<Resolution> = None;

        debug!(name = %name, record_type = %record_type, "Starting iterative resolution");

        while let Some(component) = state.next_component() {
            state.begin_label(component)?;

            let Some(ns) = self.probe_zone_cut(&mut state).await? else {
                break;
            };

            let Some(target) = pick_nameserver(answer_of(&ns)?) else {
                trace!(zone = %state.zone, label = %state.label_real, "No delegation here");
                break;
            };

            let fh = self.follow_delegation(&state, &target).await?;
            let hint = first_hint(answer_of(&fh)?).ok_or_else(|| {
                DomainError::NoAnswer(format!(
                    "no forwarding hint for nameserver [{}] of zone [{}]",
                    target, state.zone
                ))
            })?;

            state.delegate(hint);
            debug!(
                zone = %state.zone,
                hint = ?state.hint,
                "Zone cut found"
            );

            last_ns = Some(ns);
            last_fh = Some(fh);
        }

        state.consume_remaining();

        if state.label_real.is_empty() {
            match record_type {
                RecordType::FH => {
                    let fh = last_fh
                        .ok_or_else(|| DomainError::NoValidAnswer(Box::new(state.to_partial(None))))?;
                    if self.options.verify
                        && !self
                            .caching
                            .verifier()
                            .verify(self.caching, &fh.object, self.options.depth)
                            .await
                    {
                        return Err(DomainError::AnswerNotTrusted);
                    }
                    return Ok(fh);
                }
                RecordType::NS => {
                    if let Some(ns) = last_ns {
                        return Ok(ns);
                    }
                }
                _ => {}
            }
        }

        let shape = QueryShape::new(state.zone.clone(), state.label_real.clone(), record_type);
        let resolution = self
            .caching
            .resolve_simple(shape, state.hint.clone(), self.options)
            .await?;

        let answered = resolution
            .answer
            .as_ref()
            .and_then(|answer| answer.answer_of_type(record_type))
            .is_some();
        if !answered {
            debug!(partial = %state.to_partial(None), "No valid answer");
            return Err(DomainError::NoValidAnswer(Box::new(
                state.to_partial(resolution.answer),
            )));
        }

        Ok(resolution)
    }

    /// NS probe for the current label, extending it across delegation
    /// markers; `None` when the name runs out first
    async fn probe_zone_cut(
        &self,
        state: &mut ResolutionState,
    ) -> Result<Option<Resolution>, DomainError> {
        loop {
            let shape = QueryShape::new(
                state.zone.clone(),
                state.label_logical.clone(),
                RecordType::NS,
            );
            trace!(query = %shape.query_name(), "NS probe");

            let reply = self
                .caching
                .resolve_simple(shape, state.hint.clone(), self.options)
                .await?;

            if !answer_of(&reply)?.is_delegation_marker() {
                return Ok(Some(reply));
            }

            match state.next_component() {
                Some(component) => state.extend_label(component)?,
                None => return Ok(None),
            }
        }
    }

    /// FH query for a nameserver inside the current zone
    async fn follow_delegation(
        &self,
        state: &ResolutionState,
        target: &str,
    ) -> Result<Resolution, DomainError> {
        let Some(label) = relative_label(&state.zone, target)? else {
            return Err(DomainError::UnsupportedDelegation {
                zone: state.zone.clone(),
                target: target.to_string(),
            });
        };

        let shape = QueryShape::new(state.zone.clone(), label, RecordType::FH);
        trace!(query = %shape.query_name(), "FH query");

        self.caching
            .resolve_simple(shape, state.hint.clone(), self.options)
            .await
    }
}

fn answer_of(resolution: &Resolution) -> Result<&RecordSetMessage, DomainError> {
    resolution
        .answer
        .as_ref()
        .ok_or_else(|| DomainError::NoAnswer(format!("[{}] has no payload", resolution.object.name)))
}

/// Random NS target of an NS answer
fn pick_nameserver(answer: &RecordSetMessage) -> Option<String> {
    let targets: Vec<&str> = answer
        .answer_of_type(RecordType::NS)?
        .records
        .iter()
        .filter_map(|record| match &record.data {
            RecordData::Ns { target } => Some(target.as_str()),
            _ => None,
        })
        .collect();

    if targets.is_empty() {
        return None;
    }
    Some(targets[fastrand::usize(..targets.len())].to_string())
}

fn first_hint(answer: &RecordSetMessage) -> Option<Name> {
    answer
        .answer_of_type(RecordType::FH)?
        .records
        .iter()
        .find_map(|record| match &record.data {
            RecordData::Fh { hint, .. } => Some(hint.clone()),
            _ => None,
        })
}
