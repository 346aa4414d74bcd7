// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Pathology catalog: which remote model scores which finding

pub mod catalog;

pub use catalog::{
    display_name, normalize_key, PathologyCatalog, PathologyEntry, UnknownPathology,
    DEFAULT_PATHOLOGY,
};
