// Analysis service access: the capability trait, its HTTP implementation,
// the parsed result model, and the display derivation over it.
//
// The service itself is a black box. This module only knows the wire
// contract: one multipart POST in, one JSON body out.

pub mod client;
pub mod result;
pub mod traits;
pub mod view;
