pub mod analyze_controller;
pub mod bulk_controller;

pub use analyze_controller::AnalyzeController;
pub use bulk_controller::BulkController;
