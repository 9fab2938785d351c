//! HTTP middleware: request ids and the session layer.

mod request_id;
mod session;

pub use request_id::{REQUEST_ID_HEADER, request_id_middleware};
pub use session::create_session_layer;
