//! Integration test suite.
//!
//! 1. Task grid and form scenarios
//! 2. Schema files on disk
//! 3. Foreign key option resolution

pub mod fk_option_tests;
pub mod helpers;
pub mod schema_file_tests;
pub mod task_scenario_tests;
