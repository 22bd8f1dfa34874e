// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// lembar-cli — bundle loading and subcommand handlers behind the `lembar`
// binary.

pub mod bundle;
pub mod commands;
