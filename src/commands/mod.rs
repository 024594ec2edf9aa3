// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

pub mod expenses;
pub mod exporter;
pub mod fx;
pub mod income;
pub mod investors;
pub mod reports;
pub mod search;
pub mod transactions;
