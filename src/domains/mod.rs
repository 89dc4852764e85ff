//! Domains module containing the server's business logic.
//!
//! - **tools**: the registry, the invocation protocol and the tool catalogue
//! - **store**: the document-store collaborator used by the data tools

pub mod store;
pub mod tools;
