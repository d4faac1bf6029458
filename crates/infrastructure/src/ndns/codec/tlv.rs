//! Signed object (Data packet) TLV codec
//!
//! NDN-style type-length-value layout with variable-length numbers:
//!
//! ```text
//! Data           := 0x06 len Name MetaInfo? Content? SignatureInfo SignatureValue
//! Name           := 0x07 len Component*
//! Component      := 0x08 len bytes
//! MetaInfo       := 0x14 len ContentType? FreshnessPeriod?
//! ContentType    := 0x18 len nonNegativeInteger
//! FreshnessPeriod:= 0x19 len nonNegativeInteger (milliseconds)
//! Content        := 0x15 len bytes
//! SignatureInfo  := 0x16 len KeyLocator?
//! KeyLocator     := 0x1c len Name
//! SignatureValue := 0x17 len bytes
//! ```

use bytes::{Buf, BufMut, Bytes, BytesMut};
use ndns_application::ports::PacketCodec;
use ndns_domain::{Component, ContentType, DomainError, Name, SignedObject};

const TLV_DATA: u64 = 0x06;
const TLV_NAME: u64 = 0x07;
const TLV_COMPONENT: u64 = 0x08;
const TLV_META_INFO: u64 = 0x14;
const TLV_CONTENT: u64 = 0x15;
const TLV_SIGNATURE_INFO: u64 = 0x16;
const TLV_SIGNATURE_VALUE: u64 = 0x17;
const TLV_CONTENT_TYPE: u64 = 0x18;
const TLV_FRESHNESS_PERIOD: u64 = 0x19;
const TLV_KEY_LOCATOR: u64 = 0x1c;

pub struct TlvPacketCodec;

impl TlvPacketCodec {
    pub fn new() -> Self {
        Self
    }
}

impl Default for TlvPacketCodec {
    fn default() -> Self {
        Self::new()
    }
}

impl PacketCodec for TlvPacketCodec {
    fn encode(&self, object: &SignedObject) -> Bytes {
        let mut body = BytesMut::with_capacity(128 + object.content.len());

        put_name(&mut body, TLV_NAME, &object.name);

        let mut meta = BytesMut::new();
        put_number_tlv(
            &mut meta,
            TLV_CONTENT_TYPE,
            u64::from(object.content_type.to_u8()),
        );
        put_number_tlv(
            &mut meta,
            TLV_FRESHNESS_PERIOD,
            u64::from(object.freshness_seconds) * 1000,
        );
        put_tlv(&mut body, TLV_META_INFO, &meta);

        put_tlv(&mut body, TLV_CONTENT, &object.content);

        let mut signature_info = BytesMut::new();
        if let Some(key_name) = &object.key_locator {
            let mut locator = BytesMut::new();
            put_name(&mut locator, TLV_NAME, key_name);
            put_tlv(&mut signature_info, TLV_KEY_LOCATOR, &locator);
        }
        put_tlv(&mut body, TLV_SIGNATURE_INFO, &signature_info);
        put_tlv(&mut body, TLV_SIGNATURE_VALUE, &object.signature);

        let mut packet = BytesMut::with_capacity(body.len() + 10);
        put_tlv(&mut packet, TLV_DATA, &body);
        packet.freeze()
    }

    fn decode(&self, bytes: &[u8]) -> Result<SignedObject, DomainError> {
        let mut input = bytes;
        let (tlv_type, mut body) = read_tlv(&mut input)?;
        if tlv_type != TLV_DATA {
            return Err(invalid(format!("expected Data, found TLV type {}", tlv_type)));
        }
        if input.has_remaining() {
            return Err(invalid("trailing bytes after Data".to_string()));
        }

        let mut name = None;
        let mut content = Bytes::new();
        let mut content_type = ContentType::Data;
        let mut freshness_seconds = 0;
        let mut key_locator = None;
        let mut signature = None;

        while body.has_remaining() {
            let (tlv_type, value) = read_tlv(&mut body)?;
            match tlv_type {
                TLV_NAME => name = Some(read_name_value(value)?),
                TLV_META_INFO => {
                    let mut meta = value;
                    while meta.has_remaining() {
                        let (meta_type, meta_value) = read_tlv(&mut meta)?;
                        match meta_type {
                            TLV_CONTENT_TYPE => {
                                let code = read_number_value(meta_value)?;
                                content_type = u8::try_from(code)
                                    .ok()
                                    .and_then(ContentType::from_u8)
                                    .ok_or_else(|| {
                                        invalid(format!("unknown content type {}", code))
                                    })?;
                            }
                            TLV_FRESHNESS_PERIOD => {
                                let millis = read_number_value(meta_value)?;
                                freshness_seconds =
                                    u32::try_from(millis / 1000).unwrap_or(u32::MAX);
                            }
                            _ => {}
                        }
                    }
                }
                TLV_CONTENT => content = Bytes::copy_from_slice(value),
                TLV_SIGNATURE_INFO => {
                    let mut info = value;
                    while info.has_remaining() {
                        let (info_type, mut info_value) = read_tlv(&mut info)?;
                        if info_type == TLV_KEY_LOCATOR {
                            let (locator_type, locator_value) = read_tlv(&mut info_value)?;
                            if locator_type != TLV_NAME {
                                return Err(invalid("key locator is not a name".to_string()));
                            }
                            key_locator = Some(read_name_value(locator_value)?);
                        }
                    }
                }
                TLV_SIGNATURE_VALUE => signature = Some(Bytes::copy_from_slice(value)),
                other => return Err(invalid(format!("unexpected TLV type {} in Data", other))),
            }
        }

        Ok(SignedObject {
            name: name.ok_or_else(|| invalid("Data without name".to_string()))?,
            content,
            content_type,
            freshness_seconds,
            key_locator,
            signature: signature.ok_or_else(|| invalid("Data without signature".to_string()))?,
        })
    }
}

fn invalid(message: String) -> DomainError {
    DomainError::InvalidPacket(message)
}

fn put_var_number(buf: &mut BytesMut, value: u64) {
    if value < 253 {
        buf.put_u8(value as u8);
    } else if value <= u64::from(u16::MAX) {
        buf.put_u8(253);
        buf.put_u16(value as u16);
    } else if value <= u64::from(u32::MAX) {
        buf.put_u8(254);
        buf.put_u32(value as u32);
    } else {
        buf.put_u8(255);
        buf.put_u64(value);
    }
}

fn put_tlv(buf: &mut BytesMut, tlv_type: u64, value: &[u8]) {
    put_var_number(buf, tlv_type);
    put_var_number(buf, value.len() as u64);
    buf.put_slice(value);
}

fn put_number_tlv(buf: &mut BytesMut, tlv_type: u64, value: u64) {
    if value <= u64::from(u8::MAX) {
        put_tlv(buf, tlv_type, &[value as u8]);
    } else if value <= u64::from(u16::MAX) {
        put_tlv(buf, tlv_type, &(value as u16).to_be_bytes());
    } else if value <= u64::from(u32::MAX) {
        put_tlv(buf, tlv_type, &(value as u32).to_be_bytes());
    } else {
        put_tlv(buf, tlv_type, &value.to_be_bytes());
    }
}

fn put_name(buf: &mut BytesMut, tlv_type: u64, name: &Name) {
    let mut value = BytesMut::new();
    for component in name {
        put_tlv(&mut value, TLV_COMPONENT, component.as_bytes());
    }
    put_tlv(buf, tlv_type, &value);
}

fn read_var_number(input: &mut &[u8]) -> Result<u64, DomainError> {
    if !input.has_remaining() {
        return Err(invalid("truncated TLV".to_string()));
    }
    let first = input.get_u8();
    let needed = match first {
        253 => 2,
        254 => 4,
        255 => 8,
        value => return Ok(u64::from(value)),
    };
    if input.remaining() < needed {
        return Err(invalid("truncated TLV number".to_string()));
    }
    Ok(match needed {
        2 => u64::from(input.get_u16()),
        4 => u64::from(input.get_u32()),
        _ => input.get_u64(),
    })
}

fn read_tlv<'a>(input: &mut &'a [u8]) -> Result<(u64, &'a [u8]), DomainError> {
    let tlv_type = read_var_number(input)?;
    let length = read_var_number(input)?;
    let length = usize::try_from(length)
        .ok()
        .filter(|length| *length <= input.len())
        .ok_or_else(|| invalid(format!("TLV type {} overruns the packet", tlv_type)))?;

    let current: &'a [u8] = *input;
    let (value, rest) = current.split_at(length);
    *input = rest;
    Ok((tlv_type, value))
}

fn read_number_value(value: &[u8]) -> Result<u64, DomainError> {
    match value.len() {
        1 | 2 | 4 | 8 => Ok(value
            .iter()
            .fold(0u64, |acc, byte| (acc << 8) | u64::from(*byte))),
        other => Err(invalid(format!("bad integer length {}", other))),
    }
}

fn read_name_value(mut value: &[u8]) -> Result<Name, DomainError> {
    let mut components = Vec::new();
    while value.has_remaining() {
        let (tlv_type, component) = read_tlv(&mut value)?;
        if tlv_type != TLV_COMPONENT {
            return Err(invalid(format!("unexpected TLV type {} in Name", tlv_type)));
        }
        components.push(Component::new(Bytes::copy_from_slice(component)));
    }
    Ok(Name::from_components(components))
}
