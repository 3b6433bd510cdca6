pub use crate::content::mediatypes::*;
pub use crate::content::{Deserialize, MediaType, SerializationError, Serialize};
pub use crate::handler::{Handler, RawResult, Res};
pub use crate::request::{Method, RawRequest, Request};
pub use crate::response::{RawResponse, Response};
pub use crate::server::Server;
pub use crate::Config;
