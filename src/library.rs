// Copyright (c) 2025 Jonathan "Razordor" Alan Thomason

use crate::os;
use crate::Symbol;
use log::debug;

/// Returns `name` with the platform shared-library suffix applied.
///
/// The suffix is appended unless the name already ends with it, or ends with
/// it followed by a dotted version tail: `"x"` becomes `"x.so"`, while
/// `"x.so"` and `"x.so.1"` are returned unchanged. An occurrence that is
/// neither does not count, so `"x.sox"` becomes `"x.sox.so"`.
pub fn canonical_file_name(name: &str) -> String {
	if name.len() >= os::DLL_SUFFIX.len() {
		if let Some(pos) = name.rfind(os::DLL_SUFFIX) {
			let tail = &name[pos + os::DLL_SUFFIX.len()..];
			if tail.is_empty() || tail.starts_with('.') {
				return name.to_owned();
			}
		}
	}
	let mut file = String::with_capacity(name.len() + os::DLL_SUFFIX.len());
	file.push_str(name);
	file.push_str(os::DLL_SUFFIX);
	file
}

// The prefix belongs on the file-name component, not on a leading directory.
// Returns `None` when the platform prefix is empty or already present.
fn prefixed_file_name(file: &str) -> Option<String> {
	if os::DLL_PREFIX.is_empty() {
		return None;
	}
	let split = file.rfind('/').map(|i| i + 1).unwrap_or(0);
	let (dir, base) = file.split_at(split);
	if base.is_empty() || base.starts_with(os::DLL_PREFIX) {
		return None;
	}
	Some(format!("{dir}{}{base}", os::DLL_PREFIX))
}

/// A handle to one shared library file.
///
/// `Library` is a small state machine: [`set_file_name`](Self::set_file_name)
/// stores the canonical file name, [`load`](Self::load) and
/// [`unload`](Self::unload) move the native handle in and out of existence,
/// and [`resolve`](Self::resolve) looks up symbols in the loaded module. No
/// operation panics on loader failure; each reports through its return value
/// and leaves the platform's message in
/// [`error_string`](Self::error_string), overwriting whatever the previous
/// call stored.
///
/// Dropping a `Library` does not unload the module; release is explicit via
/// [`unload`](Self::unload).
#[derive(Debug, Default)]
pub struct Library {
	file: String,
	handle: Option<os::Handle>,
	error: Option<String>,
}

// The native handle is an owned, opaque module reference; every platform
// loader accepts it from any thread.
unsafe impl Send for Library {}

impl Library {
	/// Constructs an empty handle with no file name.
	pub fn new() -> Self {
		Self::default()
	}

	/// Constructs a handle for `name`, canonicalized as by
	/// [`set_file_name`](Self::set_file_name).
	pub fn with_name(name: &str) -> Self {
		let mut lib = Self::new();
		lib.set_file_name(name);
		lib
	}

	/// Stores the canonical form of `name` as the file to load.
	///
	/// See [`canonical_file_name`]. No I/O is performed.
	pub fn set_file_name(&mut self, name: &str) {
		self.file = canonical_file_name(name);
	}

	/// The file name a load attempt will open, or did open.
	///
	/// The POSIX prefix retry in [`load`](Self::load) renames the stored
	/// file, so after a successful load this is the name that worked.
	pub fn file_name(&self) -> &str {
		&self.file
	}

	/// The message of the last platform call that failed, if the most recent
	/// operation failed.
	pub fn error_string(&self) -> Option<&str> {
		self.error.as_deref()
	}

	/// Whether a native handle is currently held.
	pub fn is_loaded(&self) -> bool {
		self.handle.is_some()
	}

	/// Attempts to open the stored file with the platform loader.
	///
	/// On POSIX targets a failed attempt on a file name missing the `lib`
	/// prefix is retried once with the prefix prepended; the retry renames
	/// the stored file. Returns `true` on success.
	pub fn load(&mut self) -> bool {
		if !self.try_open() {
			if let Some(retry) = prefixed_file_name(&self.file) {
				self.file = retry;
				self.try_open();
			}
		}
		self.handle.is_some()
	}

	fn try_open(&mut self) -> bool {
		match unsafe { os::dylib_open(&self.file) } {
			Ok(handle) => {
				debug!("loaded {}", self.file);
				self.handle = Some(handle);
				self.error = None;
				true
			}
			Err(e) => {
				debug!("failed to load {}: {e}", self.file);
				self.error = Some(e.to_string());
				false
			}
		}
	}

	/// Releases the native handle if one is held.
	///
	/// Returns `true` when no handle remains afterwards, including when
	/// nothing was loaded to begin with. On failure the handle is kept and
	/// the platform's message is stored.
	pub fn unload(&mut self) -> bool {
		if let Some(handle) = self.handle {
			match unsafe { os::dylib_close(handle) } {
				Ok(()) => {
					self.handle = None;
					self.error = None;
				}
				Err(e) => {
					debug!("failed to unload {}: {e}", self.file);
					self.error = Some(e.to_string());
				}
			}
		}
		self.handle.is_none()
	}

	/// Looks up `symbol` in the loaded module.
	///
	/// A failed lookup is retried once with a leading underscore to cover
	/// the old C symbol decoration convention; no further variants are
	/// tried. Returns `None` and stores the platform's message if neither
	/// spelling is found, or if nothing is loaded.
	pub fn resolve(&mut self, symbol: &str) -> Option<Symbol> {
		let Some(handle) = self.handle else {
			self.error = Some(format!("{} is not loaded", self.file));
			return None;
		};
		match unsafe { os::dylib_symbol(handle, symbol) } {
			Ok(addr) => {
				self.error = None;
				Some(Symbol(addr))
			}
			Err(e) => {
				debug!("failed to resolve {symbol} from {}: {e}", self.file);
				self.error = Some(e.to_string());
				let underscored = format!("_{symbol}");
				match unsafe { os::dylib_symbol(handle, &underscored) } {
					Ok(addr) => {
						self.error = None;
						Some(Symbol(addr))
					}
					Err(e) => {
						debug!("failed to resolve {underscored} from {}: {e}", self.file);
						self.error = Some(e.to_string());
						None
					}
				}
			}
		}
	}
}
