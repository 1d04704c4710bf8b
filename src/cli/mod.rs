pub mod args;
pub mod commands;
pub mod root;
pub mod ui;

pub use args::{Args, Commands, ScanArgs};
pub use root::RootCommand;
pub use ui::{StatusPrinter, SummaryTable};
