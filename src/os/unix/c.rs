// Copyright (c) 2025 Jonathan "Razordor" Alan Thomason

pub use libc::{dlclose, dlerror, dlopen, dlsym, RTLD_LOCAL, RTLD_NOW};
