// Copyright (c) Ken Kocienda and other contributors.
//
// This source code is licensed under the MIT license found in the
// LICENSE file in the root directory of this source tree.

//! jtree: inspect and edit Java syntax trees from the command line.
//!
//! The syntax library lives in `jtree-syntax`; this crate adds the JSON
//! command layer used by the `jtree` binary.

// Core infrastructure - re-exported from jtree-core
pub use jtree_core::error;
pub use jtree_core::output;
pub use jtree_core::text;

pub use jtree_syntax as syntax;

// Command implementations behind the binary
pub mod cli;
