//! Binary format for record-set messages
//!
//! ```text
//! message  := "NDNS" version:u8 answer_count:u16 authority_count:u16 rrset*
//! rrset    := owner_len:u8 owner type:u16 record_count:u16 record*
//! record   := ttl:u32 rdata_len:u16 rdata
//! ```
//!
//! Every message starts with the magic bytes; payloads that do not (raw
//! certificate bits, for one) fail with `DomainError::InvalidRecordData`.

use bytes::{Buf, BufMut, Bytes, BytesMut};
use compact_str::CompactString;
use ndns_application::ports::RecordCodec;
use ndns_domain::{
    Component, DomainError, Name, Record, RecordData, RecordSet, RecordSetMessage, RecordType,
};
use std::net::{Ipv4Addr, Ipv6Addr};

const MAGIC: &[u8; 4] = b"NDNS";
const FORMAT_VERSION: u8 = 1;

pub struct WireRecordCodec;

impl WireRecordCodec {
    pub fn new() -> Self {
        Self
    }

    /// Cheap check for the message header
    pub fn is_message(bytes: &[u8]) -> bool {
        bytes.len() > MAGIC.len() && bytes.starts_with(MAGIC) && bytes[4] == FORMAT_VERSION
    }
}

impl Default for WireRecordCodec {
    fn default() -> Self {
        Self::new()
    }
}

impl RecordCodec for WireRecordCodec {
    fn parse(&self, bytes: &[u8]) -> Result<RecordSetMessage, DomainError> {
        if !Self::is_message(bytes) {
            return Err(invalid("payload is not a record-set message"));
        }

        let mut input = &bytes[MAGIC.len() + 1..];
        let answer_count = take_u16(&mut input)?;
        let authority_count = take_u16(&mut input)?;

        let mut message = RecordSetMessage::new();
        for _ in 0..answer_count {
            message.answer.push(read_rrset(&mut input)?);
        }
        for _ in 0..authority_count {
            message.authority.push(read_rrset(&mut input)?);
        }

        if input.has_remaining() {
            return Err(invalid("trailing bytes after message"));
        }

        Ok(message)
    }

    fn serialize(&self, message: &RecordSetMessage) -> Result<Bytes, DomainError> {
        let mut buf = BytesMut::with_capacity(64);
        buf.put_slice(MAGIC);
        buf.put_u8(FORMAT_VERSION);
        buf.put_u16(count_u16(message.answer.len())?);
        buf.put_u16(count_u16(message.authority.len())?);

        for rrset in message.answer.iter().chain(message.authority.iter()) {
            write_rrset(&mut buf, rrset)?;
        }

        Ok(buf.freeze())
    }
}

fn invalid(message: impl Into<String>) -> DomainError {
    DomainError::InvalidRecordData(message.into())
}

fn count_u16(count: usize) -> Result<u16, DomainError> {
    u16::try_from(count).map_err(|_| invalid(format!("too many entries ({})", count)))
}

fn write_rrset(buf: &mut BytesMut, rrset: &RecordSet) -> Result<(), DomainError> {
    let owner = rrset.owner.as_bytes();
    let owner_len =
        u8::try_from(owner.len()).map_err(|_| invalid(format!("owner [{}] too long", rrset.owner)))?;
    buf.put_u8(owner_len);
    buf.put_slice(owner);
    buf.put_u16(rrset.record_type.to_u16());
    buf.put_u16(count_u16(rrset.records.len())?);

    for record in &rrset.records {
        if record.data.record_type() != rrset.record_type {
            return Err(invalid(format!(
                "{} record inside {} set",
                record.data.record_type(),
                rrset.record_type
            )));
        }
        let rdata = encode_rdata(&record.data)?;
        buf.put_u32(record.ttl);
        buf.put_u16(count_u16(rdata.len())?);
        buf.put_slice(&rdata);
    }

    Ok(())
}

fn encode_rdata(data: &RecordData) -> Result<BytesMut, DomainError> {
    let mut buf = BytesMut::new();
    match data {
        RecordData::A(address) => buf.put_slice(&address.octets()),
        RecordData::AAAA(address) => buf.put_slice(&address.octets()),
        RecordData::Ns { target } => buf.put_slice(target.as_bytes()),
        RecordData::Fh {
            priority,
            weight,
            hint,
        } => {
            buf.put_u16(*priority);
            buf.put_u16(*weight);
            put_name(&mut buf, hint)?;
        }
        RecordData::NdnCert { certificate } => buf.put_slice(certificate),
        RecordData::NdnCertSeq { sequence } => buf.put_u64(*sequence),
        RecordData::NdnAuth { zone } => put_name(&mut buf, zone)?,
        RecordData::Txt(strings) => {
            for text in strings {
                let len = u8::try_from(text.len())
                    .map_err(|_| invalid("TXT string longer than 255 bytes"))?;
                buf.put_u8(len);
                buf.put_slice(text.as_bytes());
            }
        }
        RecordData::NExists => {}
        RecordData::Opaque { data, .. } => buf.put_slice(data),
    }
    Ok(buf)
}

fn put_name(buf: &mut BytesMut, name: &Name) -> Result<(), DomainError> {
    buf.put_u8(u8::try_from(name.len()).map_err(|_| invalid("name has too many components"))?);
    for component in name {
        buf.put_u16(count_u16(component.len())?);
        buf.put_slice(component.as_bytes());
    }
    Ok(())
}

fn take_u8(input: &mut &[u8]) -> Result<u8, DomainError> {
    if input.remaining() < 1 {
        return Err(invalid("truncated message"));
    }
    Ok(input.get_u8())
}

fn take_u16(input: &mut &[u8]) -> Result<u16, DomainError> {
    if input.remaining() < 2 {
        return Err(invalid("truncated message"));
    }
    Ok(input.get_u16())
}

fn take_u32(input: &mut &[u8]) -> Result<u32, DomainError> {
    if input.remaining() < 4 {
        return Err(invalid("truncated message"));
    }
    Ok(input.get_u32())
}

fn take_slice<'a>(input: &mut &'a [u8], len: usize) -> Result<&'a [u8], DomainError> {
    if input.len() < len {
        return Err(invalid("truncated message"));
    }
    let current: &'a [u8] = *input;
    let (head, rest) = current.split_at(len);
    *input = rest;
    Ok(head)
}

fn read_rrset(input: &mut &[u8]) -> Result<RecordSet, DomainError> {
    let owner_len = usize::from(take_u8(input)?);
    let owner = std::str::from_utf8(take_slice(input, owner_len)?)
        .map_err(|_| invalid("owner is not utf-8"))?;

    let type_code = take_u16(input)?;
    let record_type = RecordType::from_u16(type_code)
        .ok_or_else(|| invalid(format!("unknown record type {}", type_code)))?;

    let count = take_u16(input)?;
    let mut rrset = RecordSet::new(CompactString::from(owner), record_type);
    for _ in 0..count {
        let ttl = take_u32(input)?;
        let rdata_len = usize::from(take_u16(input)?);
        let rdata = take_slice(input, rdata_len)?;
        rrset
            .records
            .push(Record::new(ttl, decode_rdata(record_type, rdata)?));
    }

    Ok(rrset)
}

fn decode_rdata(record_type: RecordType, mut rdata: &[u8]) -> Result<RecordData, DomainError> {
    let data = match record_type {
        RecordType::A => {
            let octets: [u8; 4] = rdata
                .try_into()
                .map_err(|_| invalid("A record must be 4 bytes"))?;
            return Ok(RecordData::A(Ipv4Addr::from(octets)));
        }
        RecordType::AAAA => {
            let octets: [u8; 16] = rdata
                .try_into()
                .map_err(|_| invalid("AAAA record must be 16 bytes"))?;
            return Ok(RecordData::AAAA(Ipv6Addr::from(octets)));
        }
        RecordType::NS => {
            let target =
                std::str::from_utf8(rdata).map_err(|_| invalid("NS target is not utf-8"))?;
            return Ok(RecordData::Ns {
                target: CompactString::from(target),
            });
        }
        RecordType::NDNCERT => {
            return Ok(RecordData::NdnCert {
                certificate: Bytes::copy_from_slice(rdata),
            })
        }
        RecordType::SOA => {
            return Ok(RecordData::Opaque {
                record_type,
                data: Bytes::copy_from_slice(rdata),
            })
        }
        RecordType::NEXISTS => RecordData::NExists,
        RecordType::FH => {
            let priority = take_u16(&mut rdata)?;
            let weight = take_u16(&mut rdata)?;
            let hint = read_name(&mut rdata)?;
            RecordData::Fh {
                priority,
                weight,
                hint,
            }
        }
        RecordType::NDNCERTSEQ => {
            if rdata.remaining() < 8 {
                return Err(invalid("NDNCERTSEQ record must be 8 bytes"));
            }
            RecordData::NdnCertSeq {
                sequence: rdata.get_u64(),
            }
        }
        RecordType::NDNAUTH => RecordData::NdnAuth {
            zone: read_name(&mut rdata)?,
        },
        RecordType::TXT => {
            let mut strings = Vec::new();
            while rdata.has_remaining() {
                let len = usize::from(take_u8(&mut rdata)?);
                let text = std::str::from_utf8(take_slice(&mut rdata, len)?)
                    .map_err(|_| invalid("TXT string is not utf-8"))?;
                strings.push(CompactString::from(text));
            }
            RecordData::Txt(strings)
        }
    };

    if rdata.has_remaining() {
        return Err(invalid(format!("trailing bytes in {} record", record_type)));
    }
    Ok(data)
}

fn read_name(input: &mut &[u8]) -> Result<Name, DomainError> {
    let count = take_u8(input)?;
    let mut components = Vec::with_capacity(usize::from(count));
    for _ in 0..count {
        let len = usize::from(take_u16(input)?);
        components.push(Component::new(Bytes::copy_from_slice(take_slice(input, len)?)));
    }
    Ok(Name::from_components(components))
}
