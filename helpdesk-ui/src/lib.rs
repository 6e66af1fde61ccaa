pub mod app;
pub mod bridge;
mod pages;

pub fn mount() {
    leptos::mount_to_body(app::App);
}
