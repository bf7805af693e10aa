//! Crate for reading, writing and joining name mappings of Java programs.
//!
//! A mapping tree ([`tree::mappings::Mappings`]) stores the names of classes, fields, methods and method parameters
//! in a fixed number of namespaces. Such trees can be read from and written to the Tiny v1 and Tiny v2 formats, see
//! the [`tiny_v1`] and [`tiny_v2`] modules, or [`format::TinyFormat`] for choosing between them.
//!
//! Two trees sharing a namespace can be joined into a translation table, see [`join`]. A tree with more namespaces
//! can be turned into a translation table between two of them, see [`translate`].
//!
//! Errors are reported as [`anyhow::Error`], see [`error`] for telling them apart.

mod lines;

pub mod error;
pub mod name;
pub mod tree;

pub mod remapper;
pub mod index;
pub mod join;
pub mod translate;

pub mod writer;
pub mod format;
pub mod tiny_v1;
pub mod tiny_v2;
