use dynload::*;

#[test]
fn test_alias_list_seeds_logical_name() {
	let loader = Loader::new();
	loader.add_library_names("x", &["a", "b"]);
	assert_eq!(loader.library_names("x"), ["x", "a", "b"]);
	// adding again must not duplicate
	loader.add_library_names("x", &["a", "a"]);
	assert_eq!(loader.library_names("x"), ["x", "a", "b"]);
	loader.remove_library_names("x", &["a"]);
	assert_eq!(loader.library_names("x"), ["x", "b"]);
}

#[test]
fn test_alias_list_replacement() {
	let loader = Loader::new();
	loader.add_library_names("x", &["a"]);
	loader.set_library_names("x", &["only"]);
	assert_eq!(loader.library_names("x"), ["only"]);
	loader.set_library_names("x", &[]);
	assert!(loader.library_names("x").is_empty());
}

#[test]
fn test_alias_list_unknown_name() {
	let loader = Loader::new();
	assert!(loader.library_names("unregistered").is_empty());
	loader.remove_library_names("unregistered", &["a"]);
	assert!(loader.library_names("unregistered").is_empty());
}

#[test]
fn test_search_paths_dedupe_in_order() {
	let loader = Loader::new();
	loader.add_search_paths(&["/a", "/b", "/a"]);
	assert_eq!(loader.search_paths(), ["/a", "/b"]);
	loader.add_search_paths(&["/b", "/c"]);
	assert_eq!(loader.search_paths(), ["/a", "/b", "/c"]);
	loader.remove_search_paths(&["/b"]);
	assert_eq!(loader.search_paths(), ["/a", "/c"]);
	loader.set_search_paths(&["/z"]);
	assert_eq!(loader.search_paths(), ["/z"]);
}

#[test]
fn test_load_missing_library_fails_cleanly() {
	let loader = Loader::new();
	loader.add_library_names("ghost", &["dynload-test-nope1", "dynload-test-nope2"]);
	assert!(!loader.load("ghost"));
	assert!(loader.library("ghost").is_none());
	assert!(!loader.test_load("ghost"));
	assert!(loader.resolve("ghost", "anything").is_none());
}

#[test]
fn test_search_paths_do_not_break_load_failure() {
	let loader = Loader::new();
	loader.set_search_paths(&["/nonexistent-dynload-dir"]);
	assert!(!loader.load("dynload-test-ghost"));
	assert!(loader.library("dynload-test-ghost").is_none());
}

#[test]
fn test_unload_without_load_is_ok() {
	let loader = Loader::new();
	assert!(loader.unload("never-loaded"));
}

#[test]
fn test_set_file_name_is_canonical() {
	let mut lib = Library::new();
	lib.set_file_name("x");
	assert_eq!(lib.file_name(), format!("x{}", os::DLL_SUFFIX));
	// canonicalizing a canonical name is a no-op
	let canon = lib.file_name().to_owned();
	lib.set_file_name(&canon);
	assert_eq!(lib.file_name(), canon);
}

#[test]
fn test_version_tail_is_preserved() {
	let versioned = format!("x{}.1", os::DLL_SUFFIX);
	assert_eq!(canonical_file_name(&versioned), versioned);
	let lib = Library::with_name(&versioned);
	assert_eq!(lib.file_name(), versioned);
	assert!(!lib.is_loaded());
}

#[test]
fn test_resolve_without_load_sets_error() {
	let mut lib = Library::with_name("dynload-test-ghost");
	assert!(lib.resolve("foo").is_none());
	assert!(lib.error_string().is_some());
}
