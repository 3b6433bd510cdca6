//! Base for all request handlers.
use crate::content::{MediaType, MediaTypeSerializer, Serialize};
use crate::recovery::Recovery;
use crate::request::Request;
use crate::response::Response;

pub type Res<O, E> = std::result::Result<Response<O>, Response<E>>;
pub type RawResult = Res<Vec<u8>, Vec<u8>>;

/// A Handler is meant to implement an HTTP endpoint; it takes an HTTP
/// Request object and returns an HTTP Response object.
/// Handlers are used by Server implementations to handle requests.
///
/// `Ok` and `Err` both carry a response that is sent to the client; `Err`
/// marks it as an error for logging and lets combinators treat it apart.
pub trait Handler<I, O, E, C>: Sync + Send
where
    I: 'static + Sync,
    O: 'static + Sync,
    E: 'static + Sync,
{
    fn handle(&self, request: Request<I>, context: &mut C) -> Res<O, E>;

    /// Serialize successful response bodies as media type `M`.
    fn serialized<M>(self) -> MediaTypeSerializer<Self, M, O>
    where
        M: MediaType,
        O: Serialize<M>,
        Self: Sized,
    {
        MediaTypeSerializer::new(self)
    }
    /// Turn a panic in this handler into a 500 response.
    fn recovered(self) -> Recovery<Self>
    where
        Self: Sized,
    {
        Recovery::new(self)
    }
}

impl<F, I, O, E, C> Handler<I, O, E, C> for F
where
    F: Fn(Request<I>, &mut C) -> Res<O, E> + Send + Sync,
    O: Sync + 'static,
    I: Sync + 'static,
    E: Sync + 'static,
{
    fn handle(&self, request: Request<I>, context: &mut C) -> Res<O, E> {
        (self)(request, context)
    }
}
