pub mod formatter;

pub use formatter::{
    format_badge, format_contribution, format_duration, format_evaluation, format_hook_response,
    should_use_colors,
};
