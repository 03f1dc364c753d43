//! Path Module
//!
//! Dotted-path addressing inside JSON documents.
//!
//! ## Responsibilities
//! - Parse path strings such as `users[0].tags[-1]` into tokens
//! - Walk a document token by token for reads and in-place writes
//! - Implement the per-document operations (query, set, increment,
//!   push, pop, array length, remove)
//!
//! ## Example
//! ```
//! use jsonkv::path::{self, Path};
//! use serde_json::json;
//!
//! let mut doc = json!({"a": 1, "b": [1, 2, 3]});
//! let last: Path = "b[-1]".parse().unwrap();
//! assert_eq!(path::query(&doc, &last).unwrap(), json!(3));
//!
//! path::set(&mut doc, &"c.d".parse().unwrap(), json!(5)).unwrap();
//! assert_eq!(doc["c"]["d"], json!(5));
//! ```

mod token;
mod traverse;
mod ops;

pub use token::{Path, Token};
pub use traverse::{resolve_index, walk, walk_mut, Intermediates};
pub use ops::{array_len, increment, pop, push, query, remove, set};
