//! Gate.io module - REST client, request signing and wire types

pub mod auth;
pub mod messages;
pub mod rest;

pub use rest::GateIoRestClient;
