// Copyright (c) 2025 Jonathan "Razordor" Alan Thomason

use crate::{Library, Symbol};
use log::debug;
use std::collections::HashMap;
use std::path::Path;
use std::sync::{Arc, Mutex};

/// Maps logical library names to loaded modules.
///
/// A `Loader` owns three registries: an ordered search-path set, a table of
/// candidate file names per logical name, and the modules currently loaded.
/// [`load`](Self::load) ties them together: it tries each registered
/// candidate (or the logical name itself) in each configured directory and
/// keeps the first module that opens, at most one per name.
///
/// All registries live on the `Loader` instance; creating one per process
/// and sharing it gives the conventional process-wide behavior. Every
/// operation is atomic with respect to the others, so concurrent `load`
/// calls on one name open the library once.
///
/// # Examples
/// ```no_run
/// use dynload::Loader;
///
/// let loader = Loader::new();
/// loader.add_library_names("z", &["z", "zlib1"]);
/// loader.add_search_paths(&["/opt/vendor/lib"]);
/// if loader.load("z") {
/// 	let version = loader.resolve("z", "zlibVersion").unwrap();
/// }
/// ```
#[derive(Debug, Default)]
pub struct Loader {
	state: Mutex<State>,
}

#[derive(Debug, Default)]
struct State {
	search_paths: Vec<String>,
	lib_names: HashMap<String, Vec<String>>,
	loaded: HashMap<String, LibraryRef>,
}

impl State {
	// Configured directories take precedence; the bare name is left to the
	// platform's default search. Absolute candidates are used as given.
	fn locate(&self, candidate: &str) -> Vec<String> {
		if Path::new(candidate).is_absolute() {
			return vec![candidate.to_owned()];
		}
		let mut files = Vec::with_capacity(self.search_paths.len() + 1);
		for dir in &self.search_paths {
			files.push(Path::new(dir).join(candidate).to_string_lossy().into_owned());
		}
		files.push(candidate.to_owned());
		files
	}
}

/// Shared view of a library registered in a [`Loader`].
///
/// Stays valid after the owning loader drops the entry; the underlying
/// module is only released once [`Loader::unload`] succeeds.
#[derive(Debug, Clone)]
pub struct LibraryRef(Arc<Mutex<Library>>);

impl LibraryRef {
	/// The file name the module was loaded from.
	pub fn file_name(&self) -> String {
		self.0.lock().unwrap().file_name().to_owned()
	}

	/// The message of the last failed operation on this handle, if the most
	/// recent operation failed.
	pub fn error_string(&self) -> Option<String> {
		self.0.lock().unwrap().error_string().map(str::to_owned)
	}

	/// Whether the module is still loaded.
	pub fn is_loaded(&self) -> bool {
		self.0.lock().unwrap().is_loaded()
	}

	/// Looks up `symbol` in the module, with the underscore retry of
	/// [`Library::resolve`].
	pub fn resolve(&self, symbol: &str) -> Option<Symbol> {
		self.0.lock().unwrap().resolve(symbol)
	}
}

impl Loader {
	/// Creates a loader with no search paths, aliases, or loaded modules.
	pub fn new() -> Self {
		Self::default()
	}

	/// Loads the library known as `name`.
	///
	/// Already loaded names return `true` immediately. Otherwise the
	/// registered candidates (or `name` itself when none are registered) are
	/// tried in order with a fresh handle each, and the first success is
	/// registered. When every candidate fails nothing is registered and
	/// `false` is returned; the per-candidate errors are emitted as `debug`
	/// log records.
	pub fn load(&self, name: &str) -> bool {
		let mut state = self.state.lock().unwrap();
		if state.loaded.contains_key(name) {
			debug!("{name} is already loaded");
			return true;
		}
		let candidates = match state.lib_names.get(name) {
			Some(names) if !names.is_empty() => names.clone(),
			_ => vec![name.to_owned()],
		};
		for candidate in &candidates {
			for file in state.locate(candidate) {
				let mut lib = Library::new();
				lib.set_file_name(&file);
				if lib.load() {
					state
						.loaded
						.insert(name.to_owned(), LibraryRef(Arc::new(Mutex::new(lib))));
					return true;
				}
			}
		}
		debug!("no candidate for {name} could be loaded");
		false
	}

	/// Loads `name` unless it is already loaded.
	///
	/// Despite the name this is not a dry run: a library that is not yet
	/// loaded really is loaded, exactly as [`load`](Self::load) would.
	pub fn test_load(&self, name: &str) -> bool {
		self.load(name)
	}

	/// Returns the handle registered for `name`, if it is loaded.
	pub fn library(&self, name: &str) -> Option<LibraryRef> {
		self.state.lock().unwrap().loaded.get(name).cloned()
	}

	/// Unloads the library known as `name` and forgets its handle.
	///
	/// Returns `true` when `name` is not loaded afterwards, including when
	/// it never was. If the platform refuses to release the module the entry
	/// stays registered, `false` is returned, and the error is readable
	/// through [`library`](Self::library).
	pub fn unload(&self, name: &str) -> bool {
		let mut state = self.state.lock().unwrap();
		let Some(lib) = state.loaded.get(name) else {
			debug!("{name} is not loaded");
			return true;
		};
		if !lib.0.lock().unwrap().unload() {
			return false;
		}
		state.loaded.remove(name);
		true
	}

	/// Loads `name` if necessary and resolves `symbol` from it.
	pub fn resolve(&self, name: &str, symbol: &str) -> Option<Symbol> {
		if !self.load(name) {
			return None;
		}
		self.library(name)?.resolve(symbol)
	}

	/// Replaces the directories consulted before the platform's default
	/// search.
	pub fn set_search_paths(&self, paths: &[&str]) {
		let mut state = self.state.lock().unwrap();
		state.search_paths = paths.iter().map(|p| (*p).to_owned()).collect();
	}

	/// Appends directories not already present, preserving arrival order.
	pub fn add_search_paths(&self, paths: &[&str]) {
		let mut state = self.state.lock().unwrap();
		for path in paths {
			if !state.search_paths.iter().any(|p| p.as_str() == *path) {
				state.search_paths.push((*path).to_owned());
			}
		}
	}

	/// Removes every listed directory from the search-path set.
	pub fn remove_search_paths(&self, paths: &[&str]) {
		let mut state = self.state.lock().unwrap();
		state.search_paths.retain(|p| !paths.contains(&p.as_str()));
	}

	/// The directories currently consulted, in order.
	pub fn search_paths(&self) -> Vec<String> {
		self.state.lock().unwrap().search_paths.clone()
	}

	/// Replaces the candidate file names tried for `name` outright.
	///
	/// Setting an empty list restores the default of trying `name` itself.
	pub fn set_library_names(&self, name: &str, names: &[&str]) {
		let mut state = self.state.lock().unwrap();
		state
			.lib_names
			.insert(name.to_owned(), names.iter().map(|n| (*n).to_owned()).collect());
	}

	/// Registers candidate file names for `name`, preserving order and
	/// skipping entries already present.
	///
	/// An empty candidate list is first seeded with `name` itself, so the
	/// logical name stays the first candidate tried.
	pub fn add_library_names(&self, name: &str, names: &[&str]) {
		let mut state = self.state.lock().unwrap();
		let list = state.lib_names.entry(name.to_owned()).or_default();
		if list.is_empty() {
			list.push(name.to_owned());
		}
		for n in names {
			if !list.iter().any(|x| x.as_str() == *n) {
				list.push((*n).to_owned());
			}
		}
	}

	/// Removes the listed candidates from `name`'s list.
	pub fn remove_library_names(&self, name: &str, names: &[&str]) {
		let mut state = self.state.lock().unwrap();
		if let Some(list) = state.lib_names.get_mut(name) {
			list.retain(|x| !names.contains(&x.as_str()));
		}
	}

	/// The candidates currently registered for `name`.
	///
	/// An empty list means `name` itself is the only candidate tried.
	pub fn library_names(&self, name: &str) -> Vec<String> {
		self.state
			.lock()
			.unwrap()
			.lib_names
			.get(name)
			.cloned()
			.unwrap_or_default()
	}
}
