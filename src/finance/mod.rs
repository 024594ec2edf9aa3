// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Pure calculations over record snapshots. Nothing in here performs I/O.

pub mod aggregate;
pub mod cadence;
pub mod currency;
pub mod history;
pub mod search;
pub mod split;

pub use aggregate::{Breakdown, InvestorShare, Summary, Totals, summarize};
pub use search::{SearchResult, search};
pub use split::validate_split;
