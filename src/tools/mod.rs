pub mod analyze_client;
pub mod print_config;
