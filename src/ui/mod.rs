pub mod layout;
mod analysis;
mod menu;
mod quiz;
mod review;
mod summary;
mod working;

pub use analysis::draw_analysis;
pub use layout::{calculate_quiz_chunks, calculate_review_chunks, calculate_summary_chunks};
pub use menu::draw_menu;
pub use quiz::{draw_quit_confirmation, draw_quiz};
pub use review::draw_review;
pub use summary::draw_summary;
pub use working::draw_working;
