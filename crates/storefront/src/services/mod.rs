//! Service layer between route handlers and external collaborators.

pub mod checkout;
pub mod gateway;

pub use checkout::checkout_url;
pub use gateway::{GatewayError, GatewayReply, GatewayRequest, GatewayService};
