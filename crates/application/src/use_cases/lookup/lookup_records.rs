use crate::ports::{NameResolver, Resolution};
use ndns_domain::{ndnify, DomainError, Name, RecordType};
use std::sync::Arc;
use tracing::debug;

/// Resolve a user-supplied name and record type
///
/// The name may be given in native form (`/ndn/edu/ucla/www`) or dns-ified
/// form (`www.ucla.edu.ndn`).
pub struct LookupRecordsUseCase {
    resolver: Arc<dyn NameResolver>,
}

impl LookupRecordsUseCase {
    pub fn new(resolver: Arc<dyn NameResolver>) -> Self {
        Self { resolver }
    }

    pub async fn execute(&self, name: &str, record_type: &str) -> Result<Resolution, DomainError> {
        let name = parse_input_name(name)?;
        let record_type: RecordType = record_type
            .parse()
            .map_err(|_| DomainError::MalformedQuery(format!("{} {}", name, record_type)))?;

        debug!(name = %name, record_type = %record_type, "Looking up records");

        self.resolver.resolve(&name, record_type).await
    }
}

fn parse_input_name(input: &str) -> Result<Name, DomainError> {
    let input = input.trim();
    if input.is_empty() {
        return Err(DomainError::InvalidName("empty name".into()));
    }

    if input.starts_with('/') || input.contains(':') {
        Name::parse(input)
    } else {
        Ok(ndnify(input))
    }
}
