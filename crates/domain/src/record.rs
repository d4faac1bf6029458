use super::name::Name;
use super::RecordType;
use bytes::Bytes;
use compact_str::CompactString;
use std::net::{Ipv4Addr, Ipv6Addr};

/// Typed record data
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecordData {
    A(Ipv4Addr),
    AAAA(Ipv6Addr),
    /// Nameserver; the target is a dotted DNS-style name
    Ns { target: CompactString },
    /// Forwarding hint towards the zone's producer
    Fh { priority: u16, weight: u16, hint: Name },
    /// Raw certificate bits (e.g. public key)
    NdnCert { certificate: Bytes },
    NdnCertSeq { sequence: u64 },
    /// Delegation marker naming the authoritative zone
    NdnAuth { zone: Name },
    Txt(Vec<CompactString>),
    NExists,
    /// Any type whose data is carried opaquely (SOA)
    Opaque { record_type: RecordType, data: Bytes },
}

impl RecordData {
    pub fn record_type(&self) -> RecordType {
        match self {
            RecordData::A(_) => RecordType::A,
            RecordData::AAAA(_) => RecordType::AAAA,
            RecordData::Ns { .. } => RecordType::NS,
            RecordData::Fh { .. } => RecordType::FH,
            RecordData::NdnCert { .. } => RecordType::NDNCERT,
            RecordData::NdnCertSeq { .. } => RecordType::NDNCERTSEQ,
            RecordData::NdnAuth { .. } => RecordType::NDNAUTH,
            RecordData::Txt(_) => RecordType::TXT,
            RecordData::NExists => RecordType::NEXISTS,
            RecordData::Opaque { record_type, .. } => *record_type,
        }
    }
}

/// One resource record
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Record {
    /// Time to live in seconds
    pub ttl: u32,
    pub data: RecordData,
}

impl Record {
    pub fn new(ttl: u32, data: RecordData) -> Self {
        Self { ttl, data }
    }
}

/// Records sharing owner label and type
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordSet {
    /// Owner label in dotted form
    pub owner: CompactString,
    pub record_type: RecordType,
    pub records: Vec<Record>,
}

impl RecordSet {
    pub fn new(owner: impl Into<CompactString>, record_type: RecordType) -> Self {
        Self {
            owner: owner.into(),
            record_type,
            records: Vec::new(),
        }
    }

    pub fn with_record(mut self, ttl: u32, data: RecordData) -> Self {
        self.records.push(Record::new(ttl, data));
        self
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn min_ttl(&self) -> Option<u32> {
        self.records.iter().map(|r| r.ttl).min()
    }
}

/// Parsed answer payload: answer and authority sections
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RecordSetMessage {
    pub answer: Vec<RecordSet>,
    pub authority: Vec<RecordSet>,
}

impl RecordSetMessage {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_answer(mut self, rrset: RecordSet) -> Self {
        self.answer.push(rrset);
        self
    }

    pub fn with_authority(mut self, rrset: RecordSet) -> Self {
        self.authority.push(rrset);
        self
    }

    /// Type of the first answer record set
    pub fn answer_type(&self) -> Option<RecordType> {
        self.answer.first().map(|rrset| rrset.record_type)
    }

    /// The first answer set, if it has the expected type and is not empty
    pub fn answer_of_type(&self, record_type: RecordType) -> Option<&RecordSet> {
        self.answer
            .first()
            .filter(|rrset| rrset.record_type == record_type && !rrset.is_empty())
    }

    /// Empty answer with exactly one `NDNAUTH` authority set: the zone cut
    /// lies below the label that was asked for
    pub fn is_delegation_marker(&self) -> bool {
        self.answer.is_empty()
            && self.authority.len() == 1
            && self.authority[0].record_type == RecordType::NDNAUTH
    }
}
