//! The pingd endpoints: `GET /ping` and `/health`.
use crate::content::mediatypes::ApplicationJson;
use crate::handler::{Handler, RawResult, Res};
use crate::request::RawRequest;
use crate::response::Response;
use crate::router::Router;

#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Message {
    pub message: String,
}

impl Message {
    pub fn new(message: &str) -> Self {
        Self {
            message: message.to_string(),
        }
    }
}

pub fn ping(_request: RawRequest, _: &mut ()) -> Res<Message, Vec<u8>> {
    Ok(Response::new(200).with_body(Message::new("pong")))
}

pub fn health(_request: RawRequest, _: &mut ()) -> RawResult {
    Ok(Response::text(200, "OK"))
}

/// `/ping` answers GET only, `/health` any method.
pub fn routes() -> Router<Vec<u8>, Vec<u8>, Vec<u8>, ()> {
    Router::new()
        .get("/ping", ping.serialized::<ApplicationJson>())
        .with_route("/health", health)
}
