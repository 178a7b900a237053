//! Remote log client for the file sync engine.
//!
//! The server keeps an authoritative, per-collection log of file changes.
//! This crate defines the contract the sync engine needs from it
//! ([`RemoteLogClient`]), the request and response bodies of that contract,
//! and [`HttpRemoteLog`], the reqwest implementation against the HTTP API.
//!
//! Every call carries the caller's auth token; the client itself holds no
//! session state.

mod api;
mod config;
mod error;
mod http;
mod remote;

pub use api::{
    DeleteFromTrashRequest, DiffPage, MagicMetadataUpdate, MetadataScope, TrashItem,
    TrashRequest, UpdateMagicMetadataRequest,
};
pub use config::ApiConfig;
pub use error::{CloudError, CloudResult};
pub use http::{HttpRemoteLog, AUTH_HEADER};
pub use remote::RemoteLogClient;
