//! External service access

pub mod gateway;

pub use gateway::{Gateway, GatewayBody, GatewayError, GatewayRequest, HttpGateway, Method};
