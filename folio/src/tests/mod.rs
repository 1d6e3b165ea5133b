// Copyright 2025 the Folio Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

mod test_changes;
mod test_queries;
mod utils;
