use super::Handle;
use std::{ffi, io, ptr, ptr::NonNull};

use windows_sys::Win32::Foundation::FreeLibrary;
use windows_sys::Win32::System::LibraryLoader::{GetProcAddress, LoadLibraryExW};

fn to_wide(path: &str) -> Vec<u16> {
	path.encode_utf16().chain(std::iter::once(0u16)).collect()
}

#[inline]
pub(crate) unsafe fn dylib_open(path: &str) -> io::Result<Handle> {
	let wide_str: Vec<u16> = to_wide(path);
	let handle = LoadLibraryExW(wide_str.as_ptr(), ptr::null_mut(), 0);
	match NonNull::new(handle) {
		Some(handle) => Ok(handle),
		None => Err(io::Error::last_os_error()),
	}
}

#[inline]
pub(crate) unsafe fn dylib_close(lib_handle: Handle) -> io::Result<()> {
	if FreeLibrary(lib_handle.as_ptr()) == 0 {
		Err(io::Error::last_os_error())
	} else {
		Ok(())
	}
}

#[inline]
pub(crate) unsafe fn dylib_symbol(
	lib_handle: Handle,
	name: &str,
) -> io::Result<NonNull<ffi::c_void>> {
	let c_str = ffi::CString::new(name)?;
	match GetProcAddress(lib_handle.as_ptr(), c_str.as_ptr().cast()) {
		Some(addr) => Ok(NonNull::new_unchecked(addr as *mut ffi::c_void)),
		None => Err(io::Error::last_os_error()),
	}
}
