// Copyright 2025 the Wayfind Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Ready-made [`Detector`](crate::Detector) strategies.
//!
//! - [`notify`]: explicit open/close notifications pushed by the host.
//! - [`poll`]: a boolean "is this panel open" probe polled every tick.
//! - [`fade`]: an opacity probe polled every tick; transitions become lifecycle reports.

pub mod fade;
pub mod notify;
pub mod poll;
