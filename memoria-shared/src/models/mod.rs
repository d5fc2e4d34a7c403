/// Database models for Memoria
///
/// Each model owns its table's queries as associated functions taking a
/// `&PgPool` (or any `PgExecutor` where the call may run inside a caller's
/// transaction).
///
/// - `user`: accounts and password hashes
/// - `event`: calendar events and reminder linking
/// - `reminder`: to-dos with status and priority
/// - `folder`: nested folders for files
/// - `file`: uploaded file records
/// - `image`: OCR-annotated images attached to files
/// - `analysis_task`: deferred image analysis jobs

pub mod analysis_task;
pub mod event;
pub mod file;
pub mod folder;
pub mod image;
pub mod reminder;
pub mod user;
