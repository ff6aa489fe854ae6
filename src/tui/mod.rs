pub mod app;
pub mod input;
pub mod results;

pub use app::{App, Status};
pub use input::InputWidget;
pub use results::{ResultsTable, RowTone};
