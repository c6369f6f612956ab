//! Black-box HTTP test harness for the pet-store API.
//!
//! # Overview
//! A `Dispatcher` resolves a method, URL template and payload into a request,
//! sends it once and returns the response untouched. The `assertions`
//! module then checks one property of that response per call: status,
//! content type, JSON validity, field values, required keys, headers.
//!
//! # Design
//! - Transport and verification stay apart: the dispatcher never inspects a
//!   response, assertions never mutate one.
//! - Assertions return `Result<(), AssertionFailure>` so scenarios compose
//!   them with `?`.
//! - Configuration is built per scenario; nothing is global.
//!
//! ```no_run
//! use petstore_harness::{assertions::*, petstore, Dispatcher, HarnessConfig};
//!
//! # fn main() -> petstore_harness::Result<()> {
//! let dispatcher = Dispatcher::new(HarnessConfig::from_env());
//! let response = dispatcher.get(petstore::FIND_BY_STATUS, Some(petstore::PetStatus::Sold.query()))?;
//! assert_status(&response, petstore::STATUS_OK)?;
//! assert_each_item_field_equals(&response, "status", "sold")?;
//! # Ok(())
//! # }
//! ```

pub mod assertions;
pub mod config;
pub mod dispatch;
pub mod error;
pub mod http;
pub mod json;
pub mod petstore;

pub use config::HarnessConfig;
pub use dispatch::{Dispatcher, Payload, RequestDescriptor, Transport, UreqTransport};
pub use error::{AssertionFailure, HarnessError, Result, TransportError};
pub use http::{Headers, HttpMethod, HttpRequest, Response};
pub use json::{FieldError, JsonExt};
