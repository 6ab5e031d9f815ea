//! Last.fm API access.
//!
//! - [`Transport`]: sends one GET and returns status and body
//! - [`LastFmApi`]: builds method calls, consults the response cache and
//!   decodes the responses the harvester needs

pub mod client;
pub mod transport;

pub use client::{ApiRequest, Fetched, LastFmApi};
pub use transport::{HttpTransport, RawResponse, Transport};
