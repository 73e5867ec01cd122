// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! I/O operations for user media and exported templates.

pub mod export;
pub mod media;
