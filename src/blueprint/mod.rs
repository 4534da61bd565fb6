//! The blueprint codec: envelope framing, binary record schema, geometry
//! kernel, index remapper, and the reusable session façade.
//!
//! Decode flow: text → [`envelope`] split → [`envelope::parse_head`] →
//! [`primitive::base64`] decode → [`primitive::gzip`] decode → [`schema`]
//! walk (header, areas, `numBuildings`, buildings) → [`model::Blueprint`].
//! Encode is the mirror image, with [`reference::IndexTable`] rewriting
//! cross-references and [`primitive::fingerprint`] computed over the
//! emitted text last. [`geometry`] and [`api`] are used by editing tools
//! between decode and encode.

pub mod api;
pub mod codec;
pub mod envelope;
pub mod error;
pub mod geometry;
pub mod model;
pub mod primitive;
pub mod reference;
pub mod schema;
