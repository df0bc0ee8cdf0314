pub mod app;
pub mod dashboard;
pub mod login;
pub mod ui;
pub mod utils;

pub use app::{App, Screen};
pub use dashboard::Dashboard;
pub use login::LoginForm;
