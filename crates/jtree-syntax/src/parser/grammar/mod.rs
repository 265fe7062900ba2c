// Copyright (c) Ken Kocienda and other contributors.
//
// This source code is licensed under the MIT license found in the
// LICENSE file in the root directory of this source tree.

//! Grammar productions, split by syntactic area. Every production is a
//! method on [`Parser`](super::Parser) that consumes tokens and emits nodes
//! through the builder.

mod declarations;
mod expressions;
mod lookahead;
mod statements;
mod types;
