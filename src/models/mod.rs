pub mod advisory;
pub mod forecast;
pub mod history;
pub mod weather;

pub use advisory::*;
pub use forecast::*;
pub use history::*;
pub use weather::*;
