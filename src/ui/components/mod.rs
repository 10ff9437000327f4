mod chat_form;
mod help_popup;
mod model_totals;
mod response_panel;
mod status_bar;
mod usage_table;

pub use chat_form::ChatFormWidget;
pub use help_popup::HelpPopup;
pub use model_totals::ModelTotals;
pub use response_panel::ResponsePanel;
pub use status_bar::StatusBar;
pub use usage_table::{format_tokens, UsageTable};
