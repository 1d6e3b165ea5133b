// Copyright 2025 the Folio Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

mod env;

pub(crate) use env::{FONT_SIZE, Picture, RecordingHost, TestEnv};
