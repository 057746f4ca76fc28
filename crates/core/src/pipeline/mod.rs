pub mod batch_runner;
pub mod clean_config;
pub mod clean_file_use_case;
pub mod output_layout;
pub mod run_reporter;
