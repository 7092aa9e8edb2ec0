#![cfg(any(target_os = "linux", target_os = "macos", windows))]

use dynload::Loader;

#[cfg(target_os = "linux")]
const LIB: &str = "libc.so.6";
#[cfg(target_os = "macos")]
const LIB: &str = "libSystem.dylib";
#[cfg(windows)]
const LIB: &str = "Kernel32.dll";

// two threads racing on one name must not both open the library
#[test]
fn test_concurrent_load() {
	let loader = Loader::new();
	std::thread::scope(|s| {
		for _ in 0..4 {
			s.spawn(|| assert!(loader.load(LIB)));
		}
	});
	assert!(loader.library(LIB).is_some());
	assert!(loader.unload(LIB));
	assert!(loader.library(LIB).is_none());
}

#[test]
fn test_concurrent_config() {
	let loader = Loader::new();
	std::thread::scope(|s| {
		s.spawn(|| loader.add_search_paths(&["/a", "/b"]));
		s.spawn(|| loader.add_library_names("x", &["a"]));
	});
	assert!(loader.search_paths().contains(&"/a".to_owned()));
	assert_eq!(loader.library_names("x"), ["x", "a"]);
}
