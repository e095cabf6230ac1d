// Copyright (c) 2025 Varshith Gudur. Licensed under AGPLv3.
pub mod record_file_tests;
pub mod consensus_tests;
