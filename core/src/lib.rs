//! Client core for the pets service.
//!
//! # Overview
//! Builds `HttpRequest` values and parses `HttpResponse` values without
//! touching the network (host-does-IO pattern), and keeps the client-side
//! state of a pets screen in sync with what the server answers.
//!
//! # Design
//! - `PetClient` is stateless: it holds only `base_url`.
//! - Each CRUD operation is split into `build_*` (produces request) and
//!   `parse_*` (consumes response), so the I/O boundary is explicit.
//!   `PetApi` joins the two over any `Transport` for callers that just want
//!   one blocking call per operation.
//! - `PetsView` owns the `PetStore` and the open `PetForm`; every mutation
//!   of the list goes through it and is driven by a server response.
//! - DTOs are defined independently from the mock-server crate; integration
//!   tests catch schema drift.

pub mod api;
pub mod client;
pub mod error;
pub mod form;
pub mod http;
pub mod store;
pub mod types;
pub mod view;

pub use api::PetApi;
pub use client::PetClient;
pub use error::ApiError;
pub use form::{FormError, FormState, PetForm, SaveRequest};
pub use http::{HttpMethod, HttpRequest, HttpResponse, Transport, TransportError};
pub use store::PetStore;
pub use types::{Draft, Kind, Pet, PetId, ValidationErrors};
pub use view::{Completion, Confirm, Modal, Outgoing, PetsView, Ticket, ViewError};
