//! Business logic behind the HTTP handlers.

pub mod drive_service;
pub mod policy;
pub mod upload;

pub use drive_service::{DriveError, DriveResult, DriveService};
pub use policy::UploadPolicy;
pub use upload::{ItemResult, UploadReport};

#[cfg(test)]
pub(crate) mod test_support;
