pub mod app;
pub mod run;
