//! Ordered collections on a sentinel-based AVL tree.
//!
//! The core is [`AvlTree`], a height-balanced binary search tree whose missing child links all
//! point at one per-tree sentinel. The sentinel doubles as the end position and caches the largest
//! node, and the tree caches its smallest and largest nodes for O(1) access to both ends. Cursors
//! walk the tree through parent links alone, with no auxiliary stack.
//!
//! Three collections are thin adapters over the same engine, differing only in the
//! [`Comparator`] they order by and the [`Policy`] they insert with:
//!
//! - [`AvlMap`] - unique keys mapped to values
//! - [`AvlSet`] - unique values
//! - [`AvlMultiSet`] - values that may repeat, kept in insertion order among equals
//!
//! # Example
//!
//! ```
//! use sentinel_avl::{AvlMultiSet, AvlSet, Error};
//!
//! let mut set = AvlSet::from([5, 3, 8, 1, 4, 7, 9]);
//! let (_, inserted) = set.insert(5)?;
//! assert!(!inserted);
//! assert!(set.remove(&5));
//! assert_eq!(set.iter().copied().collect::<Vec<_>>(), [1, 3, 4, 7, 8, 9]);
//!
//! let mut multiset = AvlMultiSet::from([2, 2, 1]);
//! multiset.insert(2)?;
//! assert_eq!(multiset.count(&2), 3);
//! # Ok::<(), Error>(())
//! ```
//!
//! # Features
//!
//! - **`no_std` compatible** - Only requires `alloc`, no standard library dependency
//! - **No `unsafe`** - Nodes live in an index arena; parent and sentinel links are plain handles
//! - **Fallible insertion** - Running past [`AvlTree::max_size`] is an [`Error`], not an abort

#![no_std]
// These forbid rules and lint groups are meant to be very restrictive.
#![forbid(unsafe_code)]
#![forbid(keyword_idents)]
#![forbid(non_ascii_idents)]
#![forbid(unreachable_pub)]
#![warn(clippy::all)]
#![warn(clippy::cargo)]
#![warn(clippy::pedantic)]
// Enable coverage attributes for nightly builds.
#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

extern crate alloc;

mod compare;
mod error;
mod raw;

pub mod avl_map;
pub mod avl_multiset;
pub mod avl_set;
pub mod avl_tree;

pub use avl_map::AvlMap;
pub use avl_multiset::AvlMultiSet;
pub use avl_set::AvlSet;
pub use avl_tree::{AvlTree, Cursor, Policy, Position};
pub use compare::{ByKey, Comparator, Descending, Natural};
pub use error::Error;
