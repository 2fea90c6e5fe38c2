// SPDX-License-Identifier: MIT

//! quill-rs: a small graph engine that drafts, critiques and revises blog
//! posts through a pluggable content service.

pub mod adk;
pub mod quill;
