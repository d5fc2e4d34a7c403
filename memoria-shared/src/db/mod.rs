/// Database plumbing: connection pool and embedded migrations
///
/// Entity models and their queries live in [`crate::models`].

pub mod migrations;
pub mod pool;
