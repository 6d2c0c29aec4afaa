// Copyright (C) 2026 the Turnero authors
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Write operations.
//!
//! Every mutation that reads before it writes runs inside an immediate
//! transaction, so concurrent admissions and call-next invocations
//! serialize on the `SQLite` write lock instead of racing.

pub mod catalog;
pub mod tickets;
