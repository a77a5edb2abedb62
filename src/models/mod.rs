pub mod news;
pub mod sentiment;
pub mod settings;
