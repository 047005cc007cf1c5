use thiserror::Error;

pub type Result<T, E = ClientError> = core::result::Result<T, E>;

#[derive(Debug, Error)]
pub enum ClientError {
    #[error("unknown robot: {0}")]
    UnknownRobot(String),
    #[error("{kind} '{name}' not found")]
    UnknownEntity { kind: &'static str, name: String },
    #[error("invalid url: {0}")]
    InvalidUrl(String),
    #[error("transport error: {0}")]
    Transport(String),
    #[error("HTTP {status} from {endpoint}")]
    Http { status: u16, endpoint: String },
    #[error("malformed response: {0}")]
    Decode(String),
    #[error("robot rejected request: {0}")]
    Rejected(String),
}
