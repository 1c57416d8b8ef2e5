use thiserror::Error;

pub type Result<T> = std::result::Result<T, LocError>;

#[derive(Error, Debug)]
pub enum LocError {
    #[error("Configuration error: {0}")]
    Config(String),
    #[error("Git error: {0}")]
    Git(#[from] Box<gix::open::Error>),
    #[error("Git repository error: {0}")]
    GitRepo(String),
    #[error("Git command failed: {0}")]
    GitCommand(String),
    #[error("Line counter error: {0}")]
    Counter(String),
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Parse error: {0}")]
    Parse(String),
    #[error("Invalid date: {0}")]
    InvalidDate(String),
    #[error("Object find error: {0}")]
    ObjectFind(#[from] Box<gix::object::find::existing::Error>),
    #[error("Commit error: {0}")]
    Commit(#[from] Box<gix::object::commit::Error>),
    #[error("Object find with conversion error: {0}")]
    ObjectFindConv(#[from] Box<gix::object::find::existing::with_conversion::Error>),
    #[error("Object decode error: {0}")]
    ObjectDecode(#[from] Box<gix::objs::decode::Error>),
}

// gix errors are large, keep the enum small by boxing them on the way in
impl From<gix::open::Error> for LocError {
    fn from(err: gix::open::Error) -> Self {
        LocError::Git(Box::new(err))
    }
}

impl From<gix::object::find::existing::Error> for LocError {
    fn from(err: gix::object::find::existing::Error) -> Self {
        LocError::ObjectFind(Box::new(err))
    }
}

impl From<gix::object::commit::Error> for LocError {
    fn from(err: gix::object::commit::Error) -> Self {
        LocError::Commit(Box::new(err))
    }
}

impl From<gix::object::find::existing::with_conversion::Error> for LocError {
    fn from(err: gix::object::find::existing::with_conversion::Error) -> Self {
        LocError::ObjectFindConv(Box::new(err))
    }
}

impl From<gix::objs::decode::Error> for LocError {
    fn from(err: gix::objs::decode::Error) -> Self {
        LocError::ObjectDecode(Box::new(err))
    }
}
