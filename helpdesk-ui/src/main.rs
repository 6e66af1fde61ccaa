fn main() {
    helpdesk_ui::mount();
}
