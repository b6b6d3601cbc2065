pub mod dashboard;
pub mod feed;
pub mod gui;
pub mod logging;
pub mod settings;
pub mod storage;
