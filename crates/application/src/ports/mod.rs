pub mod certificate_fetcher;
pub mod codec;
pub mod crypto;
pub mod name_resolver;
pub mod transport;

pub use certificate_fetcher::CertificateFetcher;
pub use codec::{PacketCodec, RecordCodec};
pub use crypto::CryptoProvider;
pub use name_resolver::{NameResolver, Resolution};
pub use transport::Transport;
