pub mod record_wire;
pub mod tlv;

pub use record_wire::WireRecordCodec;
pub use tlv::TlvPacketCodec;
