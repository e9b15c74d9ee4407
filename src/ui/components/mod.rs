pub mod card_panel;
pub mod confirm_dialog;
pub mod error_list;
pub mod progress_bar;
pub mod source_list;
