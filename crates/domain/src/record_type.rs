use std::fmt;
use std::str::FromStr;

/// Resource record types understood by the resolver
///
/// Besides the classic DNS types this includes the NDNS-specific ones:
/// - `FH`: forwarding hint for reaching a zone's authoritative producer
/// - `NDNCERT`: raw certificate (public key) blob of a zone or user key
/// - `NDNCERTSEQ`: certificate sequence number
/// - `NDNAUTH`: delegation marker, "ask again with a longer label"
/// - `NEXISTS`: explicit non-existence answer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RecordType {
    A,
    NS,
    SOA,
    TXT,
    AAAA,
    FH,
    NDNCERT,
    NDNCERTSEQ,
    NDNAUTH,
    NEXISTS,
}

impl RecordType {
    pub fn as_str(&self) -> &'static str {
        match self {
            RecordType::A => "A",
            RecordType::NS => "NS",
            RecordType::SOA => "SOA",
            RecordType::TXT => "TXT",
            RecordType::AAAA => "AAAA",
            RecordType::FH => "FH",
            RecordType::NDNCERT => "NDNCERT",
            RecordType::NDNCERTSEQ => "NDNCERTSEQ",
            RecordType::NDNAUTH => "NDNAUTH",
            RecordType::NEXISTS => "NEXISTS",
        }
    }

    /// Convert from wire format number
    ///
    /// NDNS types live in the private-use range (65280-65534).
    pub fn from_u16(value: u16) -> Option<Self> {
        match value {
            1 => Some(RecordType::A),
            2 => Some(RecordType::NS),
            6 => Some(RecordType::SOA),
            16 => Some(RecordType::TXT),
            28 => Some(RecordType::AAAA),
            65281 => Some(RecordType::NDNAUTH),
            65282 => Some(RecordType::NDNCERT),
            65283 => Some(RecordType::NDNCERTSEQ),
            65284 => Some(RecordType::FH),
            65285 => Some(RecordType::NEXISTS),
            _ => None,
        }
    }

    /// Convert to wire format number
    pub fn to_u16(&self) -> u16 {
        match self {
            RecordType::A => 1,
            RecordType::NS => 2,
            RecordType::SOA => 6,
            RecordType::TXT => 16,
            RecordType::AAAA => 28,
            RecordType::NDNAUTH => 65281,
            RecordType::NDNCERT => 65282,
            RecordType::NDNCERTSEQ => 65283,
            RecordType::FH => 65284,
            RecordType::NEXISTS => 65285,
        }
    }

    /// Records of this type are published as a raw key blob rather than a
    /// record-set message
    pub fn is_certificate(&self) -> bool {
        matches!(self, RecordType::NDNCERT)
    }
}

impl fmt::Display for RecordType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for RecordType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_uppercase().as_str() {
            "A" => Ok(RecordType::A),
            "NS" => Ok(RecordType::NS),
            "SOA" => Ok(RecordType::SOA),
            "TXT" => Ok(RecordType::TXT),
            "AAAA" => Ok(RecordType::AAAA),
            "FH" => Ok(RecordType::FH),
            "NDNCERT" => Ok(RecordType::NDNCERT),
            "NDNCERTSEQ" => Ok(RecordType::NDNCERTSEQ),
            "NDNAUTH" => Ok(RecordType::NDNAUTH),
            "NEXISTS" => Ok(RecordType::NEXISTS),
            _ => Err(format!("Unknown record type: {}", s)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_text_conversion() {
        assert_eq!("fh".parse::<RecordType>(), Ok(RecordType::FH));
        assert_eq!("NDNCERT".parse::<RecordType>(), Ok(RecordType::NDNCERT));
        assert!("DNSKEY".parse::<RecordType>().is_err());
        assert_eq!(RecordType::NDNAUTH.to_string(), "NDNAUTH");
    }

    #[test]
    fn test_wire_numbers() {
        for rtype in [
            RecordType::A,
            RecordType::NS,
            RecordType::FH,
            RecordType::NDNCERT,
            RecordType::NDNAUTH,
            RecordType::NEXISTS,
        ] {
            assert_eq!(RecordType::from_u16(rtype.to_u16()), Some(rtype));
        }
        assert_eq!(RecordType::from_u16(48), None);
    }
}
