use super::Handle;
use std::{ffi, io, ptr::NonNull};

#[cfg(not(any(target_os = "linux", target_os = "macos")))]
use std::sync;

mod c;

// dlerror is only required to be thread-safe since POSIX 2024; glibc and the
// apple runtimes are known good, everything else gets serialized.
#[cfg(not(any(target_os = "linux", target_os = "macos")))]
#[inline]
fn dylib_guard<'a>() -> sync::LockResult<sync::MutexGuard<'a, ()>> {
	static LOCK: sync::Mutex<()> = sync::Mutex::new(());
	LOCK.lock()
}

#[cfg(any(target_os = "linux", target_os = "macos"))]
#[inline(always)]
fn dylib_guard() {}

unsafe fn dylib_error() -> io::Error {
	let msg = c::dlerror();
	if msg.is_null() {
		io::Error::new(io::ErrorKind::Other, "unknown dylib error")
	} else {
		let msg = ffi::CStr::from_ptr(msg).to_string_lossy().into_owned();
		io::Error::new(io::ErrorKind::Other, msg)
	}
}

unsafe fn map_result<F>(f: F) -> io::Result<NonNull<ffi::c_void>>
where
	F: FnOnce() -> *mut ffi::c_void,
{
	let _lock = dylib_guard();
	let _ = c::dlerror(); // clear existing errors
	match NonNull::new(f()) {
		Some(ptr) => Ok(ptr),
		None => Err(dylib_error()),
	}
}

pub(crate) unsafe fn dylib_open(path: &str) -> io::Result<Handle> {
	let c_str = ffi::CString::new(path)?;
	map_result(|| c::dlopen(c_str.as_ptr(), c::RTLD_NOW | c::RTLD_LOCAL))
}

pub(crate) unsafe fn dylib_close(lib_handle: Handle) -> io::Result<()> {
	let _lock = dylib_guard();
	let _ = c::dlerror(); // clear existing errors
	if c::dlclose(lib_handle.as_ptr()) != 0 {
		Err(dylib_error())
	} else {
		Ok(())
	}
}

pub(crate) unsafe fn dylib_symbol(
	lib_handle: Handle,
	name: &str,
) -> io::Result<NonNull<ffi::c_void>> {
	let c_str = ffi::CString::new(name)?;
	map_result(|| c::dlsym(lib_handle.as_ptr(), c_str.as_ptr()))
}
