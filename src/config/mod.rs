// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
pub mod gateway;

pub use gateway::{GatewayConfig, HopprConfig, DEFAULT_HOPPR_BASE_URL, DEFAULT_MAX_UPLOAD_BYTES};
