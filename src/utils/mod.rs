//! Utility modules
//!
//! Small helpers shared by the client: MIME detection, URL joining and the
//! HTTP interceptor hooks.

pub mod http_interceptor;
pub mod mime;
pub mod url;

pub use mime::guess_mime;
pub use url::*;
