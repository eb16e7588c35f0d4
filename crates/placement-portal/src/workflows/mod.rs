pub mod directory;
pub mod drives;
pub mod jobs;
pub mod reports;
