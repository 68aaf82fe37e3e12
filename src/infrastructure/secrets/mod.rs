pub mod credential_store;
pub mod json_file;
pub mod memory;

pub use credential_store::CredentialStore;
