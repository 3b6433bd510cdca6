//! Panic recovery for handlers.
use std::any::Any;
use std::panic::{self, AssertUnwindSafe};

use log::error;

use crate::handler::{Handler, Res};
use crate::request::Request;
use crate::response::Response;

/// Wraps a handler so that a panic while handling a request is logged and
/// answered with 500 instead of tearing down the connection.
pub struct Recovery<H> {
    handler: H,
}

impl<H> Recovery<H> {
    pub fn new(handler: H) -> Self {
        Self { handler }
    }
}

pub(crate) fn panic_message(cause: &(dyn Any + Send)) -> &str {
    if let Some(s) = cause.downcast_ref::<&'static str>() {
        *s
    } else if let Some(s) = cause.downcast_ref::<String>() {
        s.as_str()
    } else {
        "<non-string panic payload>"
    }
}

impl<H, I, O, E, C> Handler<I, O, E, C> for Recovery<H>
where
    H: Handler<I, O, E, C>,
    I: 'static + Sync,
    O: 'static + Sync,
    E: 'static + Sync,
{
    fn handle(&self, request: Request<I>, context: &mut C) -> Res<O, E> {
        let path = request.path.clone();
        recover(&path, || self.handler.handle(request, context))
    }
}

/// Run `f`, answering 500 if it panics.
pub(crate) fn recover<O, E, F>(path: &str, f: F) -> Res<O, E>
where
    F: FnOnce() -> Res<O, E>,
{
    match panic::catch_unwind(AssertUnwindSafe(f)) {
        Ok(res) => res,
        Err(cause) => {
            error!("panic while handling {}: {}", path, panic_message(&*cause));
            Err(Response::new(500))
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::handler::RawResult;
    use crate::request::RawRequest;

    #[test]
    fn test_panic_becomes_500() {
        let handler = (|_: RawRequest, _: &mut ()| -> RawResult { panic!("boom") }).recovered();
        let response = handler.handle(Request::default(), &mut ());
        assert_eq!(response.unwrap_err().status_code, 500);
    }

    #[test]
    fn test_result_passes_through() {
        let handler =
            (|_: RawRequest, _: &mut ()| -> RawResult { Err(Response::new(404)) }).recovered();
        let response = handler.handle(Request::default(), &mut ());
        assert_eq!(response.unwrap_err().status_code, 404);
    }

    #[test]
    fn test_panic_message() {
        let cause = panic::catch_unwind(|| panic!("{} {}", "formatted", 1)).unwrap_err();
        assert_eq!(panic_message(&*cause), "formatted 1");
    }
}
