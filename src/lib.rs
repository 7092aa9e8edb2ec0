// Copyright (c) 2025 Jonathan "Razordor" Alan Thomason

//! Run-time loading of shared libraries whose file name is only known at
//! run-time.
//!
//! A [`Loader`] maps a logical library name such as `"avcodec"` to whatever
//! file actually exists on the current host: registered aliases are tried in
//! order, configured search paths are consulted before the platform's
//! default search, and the first candidate that opens wins. Lookups tolerate
//! the common C decoration differences with a single bounded retry each —
//! a missing `lib` file-name prefix on POSIX targets and a leading
//! underscore on symbols.
//!
//! A missing library is an ordinary outcome, not an error: every operation
//! reports failure through its return value and leaves a readable error
//! string on the handle, so optional dependencies can be probed cheaply.
//!
//! # Examples
//! ```no_run
//! use dynload::Loader;
//! use std::mem;
//!
//! let loader = Loader::new();
//! loader.add_library_names("avutil", &["avutil-59", "avutil"]);
//! if loader.load("avutil") {
//! 	let sym = loader.resolve("avutil", "avutil_version").unwrap();
//! 	let version: unsafe extern "C" fn() -> u32 = unsafe { mem::transmute(sym.cast::<()>()) };
//! 	println!("avutil {:#x}", unsafe { version() });
//! }
//! ```

mod library;
mod loader;
pub mod os;
mod sym;

pub use library::{canonical_file_name, Library};
pub use loader::{LibraryRef, Loader};
pub use sym::Symbol;
