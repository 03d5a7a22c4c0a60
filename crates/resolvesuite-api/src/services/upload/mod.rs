//! Attachment upload pipeline
//!
//! validate type -> validate aggregate size -> assign name -> store

mod service;

pub use service::UploadGate;
