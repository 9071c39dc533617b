use thiserror::Error;

pub type Result<T> = std::result::Result<T, AttendError>;

#[derive(Error, Debug)]
pub enum AttendError {
    #[error("Git discover error: {0}")]
    GitDiscover(#[from] Box<gix::discover::Error>),
    #[error("Reference find error: {0}")]
    RefFind(#[from] Box<gix::reference::find::existing::Error>),
    #[error("Head peel error: {0}")]
    HeadPeel(#[from] Box<gix::head::peel::to_commit::Error>),
    #[error("Object find with conversion error: {0}")]
    ObjectFindConv(#[from] Box<gix::object::find::existing::with_conversion::Error>),
    #[error("Object decode error: {0}")]
    ObjectDecode(#[from] Box<gix::objs::decode::Error>),
    #[error("Commit error: {0}")]
    Commit(#[from] Box<gix::object::commit::Error>),
    #[error("History read error: {0}")]
    HistoryRead(String),
    #[error("Serialization error: {0}")]
    Serde(#[from] serde_json::Error),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Parse error: {0}")]
    Parse(String),
    #[error("Invalid date: {0}")]
    InvalidDate(String),
    #[error("Failed to write {name}: {source}")]
    Artifact {
        name: String,
        #[source]
        source: std::io::Error,
    },
    #[error("{} artifact(s) could not be written: {}", .0.len(), .0.join(", "))]
    Artifacts(Vec<String>),
}

// Manual From implementations for unboxed to boxed conversions
impl From<gix::discover::Error> for AttendError {
    fn from(err: gix::discover::Error) -> Self {
        AttendError::GitDiscover(Box::new(err))
    }
}

impl From<gix::reference::find::existing::Error> for AttendError {
    fn from(err: gix::reference::find::existing::Error) -> Self {
        AttendError::RefFind(Box::new(err))
    }
}

impl From<gix::head::peel::to_commit::Error> for AttendError {
    fn from(err: gix::head::peel::to_commit::Error) -> Self {
        AttendError::HeadPeel(Box::new(err))
    }
}

impl From<gix::object::find::existing::with_conversion::Error> for AttendError {
    fn from(err: gix::object::find::existing::with_conversion::Error) -> Self {
        AttendError::ObjectFindConv(Box::new(err))
    }
}

impl From<gix::objs::decode::Error> for AttendError {
    fn from(err: gix::objs::decode::Error) -> Self {
        AttendError::ObjectDecode(Box::new(err))
    }
}

impl From<gix::object::commit::Error> for AttendError {
    fn from(err: gix::object::commit::Error) -> Self {
        AttendError::Commit(Box::new(err))
    }
}
