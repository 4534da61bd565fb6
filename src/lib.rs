//! dspbp-codec: codec and editing toolkit for the Dyson Sphere Program
//! blueprint exchange format.
//!
//! A blueprint is a single line of text that packages a set of buildings and
//! layout areas on the game's spherical world. This crate decodes such a
//! line into a typed in-memory model, lets callers edit that model, and
//! re-encodes it, preserving the game's on-wire format bit-for-bit (modulo
//! the documented normalizations in [`blueprint::model`]).
//!
//! # Modules
//!
//! - [`blueprint`] — the codec: envelope framing, the binary record schema,
//!   the geometry kernel, the index remapper, and the reusable [`Session`]
//!   façade.
//! - [`config`] — optional session configuration loading (scratch-buffer
//!   ceiling, log level); the codec itself performs no file I/O.
//! - [`error`] — configuration error types.
//!
//! Command-line front-ends, lattice tessellation search, optimization
//! passes, and the underlying gzip/base64/MD5 primitives as anything other
//! than trait-level services are out of scope — this crate exposes only the
//! programmatic codec and editing operations.
//!
//! [`Session`]: blueprint::codec::Session

pub mod blueprint;
pub mod config;
pub mod error;

pub use blueprint::codec::Session;
pub use blueprint::model::{Area, Blueprint, Building, BuildingId, GameVersion, Offset4, Reference};
