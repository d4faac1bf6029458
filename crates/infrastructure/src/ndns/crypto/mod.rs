pub mod ed25519;
pub mod signer;

pub use ed25519::RingCrypto;
pub use signer::{rrset_data_name, DataSigner};
