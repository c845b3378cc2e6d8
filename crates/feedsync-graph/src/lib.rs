//! Graph API access for the feed mirror.
//!
//! - [`client`] talks HTTP to the external Graph API.
//! - [`dto`] mirrors the wire schema, normalising absent containers to empty
//!   lists.
//! - [`mapper`] turns the wire tree into the [`feedsync_core::post`] entity
//!   graph with back-references set.

pub mod client;
pub mod dto;
pub mod error;
pub mod mapper;

pub use client::{GraphApi, GraphClient, TokenExchangeRequest};
pub use error::{Error, Result};
