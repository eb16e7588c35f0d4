//! Persistence seams shared by the workflows plus the in-memory backend used
//! by the API binary, the demo and the tests.

mod memory;

pub use memory::InMemoryPortalStore;

/// Error enumeration for store failures.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RepositoryError {
    #[error("record already exists")]
    Conflict,
    #[error("record not found")]
    NotFound,
    #[error("record was modified concurrently")]
    StaleVersion,
    #[error("record is still referenced by {0} other record(s)")]
    Referenced(usize),
    #[error("repository unavailable: {0}")]
    Unavailable(String),
}

/// Record families that receive sequential display identifiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Sequence {
    Student,
    Company,
    Drive,
    Job,
    Report,
}

impl Sequence {
    pub const fn prefix(self) -> &'static str {
        match self {
            Sequence::Student => "STU",
            Sequence::Company => "COMP",
            Sequence::Drive => "DRV",
            Sequence::Job => "JOB",
            Sequence::Report => "RPT",
        }
    }

    /// Render `number` as a display id, e.g. `DRV0007`.
    pub fn format(self, number: u64) -> String {
        format!("{}{number:04}", self.prefix())
    }
}

/// Monotonic id allocation. Numbers are never handed out twice, even after deletes.
pub trait SequenceAllocator: Send + Sync {
    fn next_number(&self, sequence: Sequence) -> Result<u64, RepositoryError>;

    fn next_id(&self, sequence: Sequence) -> Result<String, RepositoryError> {
        self.next_number(sequence).map(|number| sequence.format(number))
    }
}
