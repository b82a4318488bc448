mod extended;
mod repository;

pub use extended::RepositoryExtended;
pub use repository::Repository;
