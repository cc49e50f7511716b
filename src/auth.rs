//! Auth-domain identifiers, signing keys, and the shared-access-signature model.

pub mod id;
pub mod key;
pub mod sas;

pub use id::*;
pub use key::*;
pub use sas::*;
