// Copyright (c) 2025 Varshith Gudur. Licensed under AGPLv3.
pub mod bundle;
pub mod commands;
pub mod telemetry;
