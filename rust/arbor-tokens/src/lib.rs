#![warn(missing_docs)]

//! Keyed-hash authorization tokens for Arbor requests.
//!
//! Every request carries a signature over a canonical payload built from
//! its verb, resource kind, resource identifier, and date. The signer and
//! the verifier construct that payload with the same code in this crate; a
//! single diverging byte would either reject legitimate requests or accept
//! forged ones.
//!
//! The keyed hash itself is a capability injected by the caller through
//! [`KeyedHasher`]; production wiring uses [`HmacSha256`] over a shared
//! secret, tests may inject a deterministic stub.

mod codec;
mod error;
mod escape;
mod headers;
mod pool;
mod window;

pub use codec::*;
pub use error::*;
pub use escape::*;
pub use headers::*;
pub use pool::*;
pub use window::*;
