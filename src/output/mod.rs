pub mod formatter;

pub use formatter::{
    format_categories, format_event_table, format_json, format_pass_fail, format_performance,
    format_report, format_score, should_use_colors,
};
