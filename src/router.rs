//! Method and exact path request routing.
use crate::handler::{Handler, Res};
use crate::request::{Method, Request};
use crate::response::Response;

/// Body of the response sent when no route matches.
pub const NOT_FOUND: &str = "404 page not found";

struct Route<I, O, E, C> {
    method: Option<Method>,
    path: String,
    // Box dyn since Router holds routes with different handler types.
    handler: Box<dyn Handler<I, O, E, C>>,
}

impl<I, O, E, C> Route<I, O, E, C> {
    fn matches<T>(&self, request: &Request<T>) -> bool {
        self.path == request.path
            && self
                .method
                .as_ref()
                .map_or(true, |method| *method == request.method)
    }
}

/// Router is a Handler which dispatches requests to any number of other
/// Handlers based on the request method and path.
///
/// Paths are matched exactly; the query string and fragment are never
/// looked at. Routes are tried in the order they were added and the first
/// match wins. Requests matching no route get a 404.
///
/// # Example
/// ```
/// use pingd::prelude::*;
/// use pingd::router::Router;
///
/// fn handle_hello(_req: RawRequest, _context: &mut ()) -> RawResult {
///     Ok(Response::new(200).with_body(b"Hello!".to_vec()))
/// }
///
/// fn handle_bye(_req: RawRequest, _context: &mut ()) -> RawResult {
///     Ok(Response::new(200).with_body(b"Bye!".to_vec()))
/// }
///
/// let router = Router::new()
///    .get("/hello", handle_hello)
///    .with_route("/bye", handle_bye);
///
/// let response = router.handle(Request::new(Method::GET, "/hello"), &mut ()).unwrap();
/// # assert_eq!(response.body, Some(b"Hello!".to_vec()));
///
/// let response = router.handle(Request::new(Method::DELETE, "/bye"), &mut ()).unwrap();
/// # assert_eq!(response.body, Some(b"Bye!".to_vec()));
///
/// let response = router.handle(Request::new(Method::POST, "/hello"), &mut ());
/// # assert_eq!(response.unwrap_err().status_code, 404);
/// ```
pub struct Router<I, O, E, C> {
    routes: Vec<Route<I, O, E, C>>,
}

impl<I: 'static + Sync, O: 'static + Sync, E: 'static + Sync, C> Router<I, O, E, C> {
    pub fn new() -> Self {
        Self { routes: vec![] }
    }
    /// Route requests for `path` with any method to `handler`.
    pub fn with_route<H>(self, path: &str, handler: H) -> Self
    where
        H: 'static + Handler<I, O, E, C>,
    {
        self.add(None, path, handler)
    }
    /// Route requests for `path` with the given method to `handler`.
    pub fn with_method_route<H>(self, method: Method, path: &str, handler: H) -> Self
    where
        H: 'static + Handler<I, O, E, C>,
    {
        self.add(Some(method), path, handler)
    }
    pub fn get<H>(self, path: &str, handler: H) -> Self
    where
        H: 'static + Handler<I, O, E, C>,
    {
        self.with_method_route(Method::GET, path, handler)
    }
    pub fn len(&self) -> usize {
        self.routes.len()
    }
    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }
    fn add<H>(mut self, method: Option<Method>, path: &str, handler: H) -> Self
    where
        H: 'static + Handler<I, O, E, C>,
    {
        self.routes.push(Route {
            method,
            path: path.to_string(),
            handler: Box::new(handler),
        });
        self
    }
}

impl<I: 'static + Sync, O: 'static + Sync, E: 'static + Sync, C> Default for Router<I, O, E, C> {
    fn default() -> Self {
        Self::new()
    }
}

impl<I: 'static + Sync, O: 'static + Sync, C> Handler<I, O, Vec<u8>, C>
    for Router<I, O, Vec<u8>, C>
{
    fn handle(&self, request: Request<I>, context: &mut C) -> Res<O, Vec<u8>> {
        match self.routes.iter().find(|route| route.matches(&request)) {
            Some(route) => route.handler.handle(request, context),
            None => Err(Response::text(404, NOT_FOUND)),
        }
    }
}
