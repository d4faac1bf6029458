use super::name::Name;
use super::query::PartialResolution;
use thiserror::Error;

#[derive(Error, Debug, Clone)]
pub enum DomainError {
    #[error("Invalid name: {0}")]
    InvalidName(String),

    #[error("No answer: {0}")]
    NoAnswer(String),

    #[error("Query answer not trusted")]
    AnswerNotTrusted,

    #[error("No valid answer ({0})")]
    NoValidAnswer(Box<PartialResolution>),

    #[error("Delegation from zone [{zone}] to [{target}] is outside the known hierarchy")]
    UnsupportedDelegation { zone: Name, target: String },

    #[error("Query timed out")]
    QueryTimeout,

    #[error("Incorrectly formatted query [{0}]")]
    MalformedQuery(String),

    #[error("Invalid record data: {0}")]
    InvalidRecordData(String),

    #[error("Invalid packet: {0}")]
    InvalidPacket(String),

    #[error("Crypto error: {0}")]
    Crypto(String),

    #[error("Transport error: {0}")]
    Transport(String),
}
