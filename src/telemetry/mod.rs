pub mod logging;
pub mod report;
pub mod writer;

pub use logging::{init_logging, log_filter};
pub use report::{render_frame, render_report};
pub use writer::{write_frame_csv, write_outputs, write_summary_json};
