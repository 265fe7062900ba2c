// Copyright (c) Ken Kocienda and other contributors.
//
// This source code is licensed under the MIT license found in the
// LICENSE file in the root directory of this source tree.

//! Typed node facades.
//!
//! Each facade is a `Copy` handle around a [`NodeId`] whose kind it has
//! checked. Getters take the tree by shared reference and delegate to the
//! role classifier; mutators take it mutably and delegate to
//! [`crate::edit`].
//!
//! ```ignore
//! use jtree_syntax::nodes::{AstNode, IfStatement};
//!
//! let stmt = IfStatement::cast(&tree, id).unwrap();
//! let cond = stmt.condition(&tree);
//! ```

mod declaration;
mod expression;
pub mod literal;
mod pattern;
mod statement;
mod traits;

pub use declaration::*;
pub use expression::*;
pub use literal::LiteralValue;
pub use pattern::*;
pub use statement::*;
pub use traits::{AstNode, NamedNode};
