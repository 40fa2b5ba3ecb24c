// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

pub mod cards;
pub mod categories;
pub mod config;
pub mod offers;
pub mod perks;
pub mod recommend;
pub mod snapshot;
pub mod transactions;
