mod config;
mod headless;
mod input;
mod page;
mod render;
