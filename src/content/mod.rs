//! Media types and body de/serialization.
use std::marker::PhantomData;

use log::error;
use thiserror::Error;

use crate::handler::{Handler, Res};
use crate::request::Request;
use crate::response::Response;

#[cfg(feature = "json")]
pub mod json;
pub mod mediatypes;
pub mod value;
#[cfg(feature = "yaml")]
pub mod yaml;

/// Add new content-types by implementing this trait.
///
/// # Example
///
/// Using the `media_type!` macro:
/// ```
/// use pingd::content::MediaType;
/// use pingd::media_type;
///
/// media_type!(ApplicationMsWord, "application", "msword");
/// media_type!(TextCsv, "text", "csv", "charset=utf-8");
///
/// assert_eq!(ApplicationMsWord::content_type(), "application/msword");
/// assert_eq!(TextCsv::content_type(), "text/csv; charset=utf-8");
/// ```
pub trait MediaType {
    fn mime_type() -> String;
    fn mime_subtype() -> String;
    fn media_type() -> String {
        format!("{}/{}", Self::mime_type(), Self::mime_subtype())
    }
    /// Optional parameters, such as `charset=utf-8`.
    fn parameters() -> Option<String> {
        None
    }
    /// Value for the *Content-Type* header.
    fn content_type() -> String {
        match Self::parameters() {
            Some(parameters) => format!("{}; {}", Self::media_type(), parameters),
            None => Self::media_type(),
        }
    }
}

/// Implement this trait to enable media type based serialization on
/// your types, like `impl Serialize<ApplicationJson> for MyType {..}`
pub trait Serialize<M: MediaType> {
    fn serialize(self) -> Result<Vec<u8>, SerializationError>;
}

/// Implement this trait to enable media type based deserialization on
/// your types, like `impl Deserialize<MyType> for ApplicationJson {..}`
pub trait Deserialize<T> {
    fn deserialize(bytes: Vec<u8>) -> Result<T, SerializationError>;
}

/// Serialize response bodies as a single, fixed media type.
///
/// Converts `Response<O>` to `Response<Vec<u8>>` and sets *Content-Type*.
/// The request's *Accept* header is not consulted.
///
/// # Example
/// ```
/// use pingd::prelude::*;
///
/// fn greeting(_req: RawRequest, _: &mut ()) -> Res<String, Vec<u8>> {
///     Ok(Response::new(200).with_body("hello".to_string()))
/// }
///
/// let handler = greeting.serialized::<TextPlain>();
/// let response = handler.handle(Request::default(), &mut ()).unwrap();
/// assert_eq!(response.header("Content-Type"), Some("text/plain; charset=utf-8"));
/// assert_eq!(response.body, Some(b"hello".to_vec()));
/// ```
pub struct MediaTypeSerializer<H, M, O> {
    handler: H,
    phantom: PhantomData<fn() -> (M, O)>,
}

impl<H, M, O> MediaTypeSerializer<H, M, O>
where
    M: MediaType,
    O: Serialize<M>,
{
    pub fn new(handler: H) -> Self {
        Self {
            handler,
            phantom: PhantomData,
        }
    }
}

impl<H, M, I, O, E, C> Handler<I, Vec<u8>, E, C> for MediaTypeSerializer<H, M, O>
where
    H: Handler<I, O, E, C>,
    M: MediaType,
    I: 'static + Sync,
    O: 'static + Sync + Serialize<M>,
    E: 'static + Sync,
{
    fn handle(&self, request: Request<I>, context: &mut C) -> Res<Vec<u8>, E> {
        let mut response = self.handler.handle(request, context)?;
        match response.body.take() {
            Some(body) => match <O as Serialize<M>>::serialize(body) {
                Ok(bytes) => Ok(response
                    .into_raw()
                    .with_header("Content-Type", &M::content_type())
                    .with_body(bytes)),
                Err(e) => {
                    error!("{}", e);
                    Err(Response::new(500))
                }
            },
            None => Ok(response.into_raw()),
        }
    }
}

#[derive(Debug, Error)]
#[error("serialization error: {reason}")]
pub struct SerializationError {
    reason: String,
}

impl SerializationError {
    pub fn new(reason: &str) -> Self {
        Self {
            reason: reason.to_string(),
        }
    }
}

/// Define a new unit struct implementing MediaType.
#[macro_export]
macro_rules! media_type {
    ( $i:ident, $t:literal, $s:literal ) => {
        pub struct $i;

        impl $crate::content::MediaType for $i {
            fn mime_type() -> String {
                $t.to_string()
            }
            fn mime_subtype() -> String {
                $s.to_string()
            }
        }
    };
    ( $i:ident, $t:literal, $s:literal, $p:literal ) => {
        pub struct $i;

        impl $crate::content::MediaType for $i {
            fn mime_type() -> String {
                $t.to_string()
            }
            fn mime_subtype() -> String {
                $s.to_string()
            }
            fn parameters() -> Option<String> {
                Some($p.to_string())
            }
        }
    };
}
