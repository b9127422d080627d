//! SOAP guild service support: XML reading and response translation

pub mod translate;
pub mod xml;

pub use translate::{FaultKind, JoinConfirmation, SoapFault};
