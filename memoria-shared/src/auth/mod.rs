/// Credential handling
///
/// Memoria has no sessions or tokens; login is a single password check
/// against the stored Argon2id hash (see [`password`]).

pub mod password;
