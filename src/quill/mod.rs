// SPDX-License-Identifier: MIT

pub mod config;
pub mod server;
pub mod workflow;
