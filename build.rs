fn main() {
    // Dependency versions are only needed when the SDK is linked in
    #[cfg(feature = "statsig")]
    built::write_built_file().expect("Failed to acquire build-time information");
}
