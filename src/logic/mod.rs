pub mod bot;
pub mod detector;
pub mod formatter;
pub mod rules;

pub use bot::AdvisoryBot;
pub use rules::RuleTable;
