use super::name::Name;
use bytes::{BufMut, Bytes, BytesMut};
use std::time::Duration;

/// Kind of payload carried by a signed object
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ContentType {
    /// Record-set message (or an encapsulated object)
    Data,
    /// Public key / certificate bits
    Key,
}

impl ContentType {
    pub fn to_u8(self) -> u8 {
        match self {
            ContentType::Data => 0,
            ContentType::Key => 2,
        }
    }

    pub fn from_u8(value: u8) -> Option<Self> {
        match value {
            0 => Some(ContentType::Data),
            2 => Some(ContentType::Key),
            _ => None,
        }
    }
}

/// A named, signed network object (NDN Data packet)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignedObject {
    pub name: Name,
    pub content: Bytes,
    pub content_type: ContentType,
    /// How long the object may be served from a cache
    pub freshness_seconds: u32,
    /// Name of the key that produced `signature`; `None` for unsigned
    /// wrappers
    pub key_locator: Option<Name>,
    pub signature: Bytes,
}

impl SignedObject {
    pub fn signer_key_name(&self) -> Option<&Name> {
        self.key_locator.as_ref()
    }

    pub fn freshness(&self) -> Duration {
        Duration::from_secs(u64::from(self.freshness_seconds))
    }

    /// Canonical bytes covered by the signature
    ///
    /// Everything except the signature itself: name, content type,
    /// freshness, key locator and content, each length-prefixed.
    pub fn signed_region(&self) -> Bytes {
        let mut buf = BytesMut::with_capacity(64 + self.content.len());

        put_name(&mut buf, &self.name);
        buf.put_u8(self.content_type.to_u8());
        buf.put_u32(self.freshness_seconds);
        match &self.key_locator {
            Some(key_name) => {
                buf.put_u8(1);
                put_name(&mut buf, key_name);
            }
            None => buf.put_u8(0),
        }
        buf.put_u32(self.content.len() as u32);
        buf.put_slice(&self.content);

        buf.freeze()
    }
}

fn put_name(buf: &mut BytesMut, name: &Name) {
    buf.put_u32(name.len() as u32);
    for component in name {
        buf.put_u32(component.len() as u32);
        buf.put_slice(component.as_bytes());
    }
}
