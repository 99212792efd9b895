//! PathQuill - a path pattern language for nested YAML/JSON data.
//!
//! Patterns such as `users.*(!admin).email` or `a.b.{name,age:years}` are
//! compiled once into a [`Path`], which can then match concrete key
//! sequences or read, write, delete and test values inside a
//! `serde_json::Value`.

pub mod config;
pub mod file;
pub mod path;

pub use path::{
    delete_in, exist_in, get_in, set_in, MatchRecord, ParseError, Path, PathError, Pattern,
    Segment, Segments,
};
