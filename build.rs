fn main() {
    // Version and git metadata for `dbsh validate` and the startup log line
    built::write_built_file().expect("Failed to acquire build-time information");
}
