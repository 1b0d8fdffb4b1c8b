fn main() {
    viewer_studio::editor::run();
}
