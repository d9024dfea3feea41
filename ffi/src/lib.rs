//! C-ABI wrapper around `munki-facts-core`.
//!
//! # Overview
//! Lets a fact-collection agent written in any language with a C FFI use the
//! Munki facts: ask whether a fact applies to the host, get the command to
//! run, run it itself, and hand the captured stdout back for parsing.
//!
//! # Design
//! - Every `extern "C"` function wraps its body in `catch_unwind` so panics
//!   never cross the FFI boundary.
//! - Facts are addressed by name (`munki_http_headers`,
//!   `munki_client_version`), the same names the host registers them under.
//! - Parsed values come back as JSON in a single `FfiFactResult` envelope.
//! - The C caller owns all returned pointers and must call the matching
//!   `munki_facts_free_*` function to release them.

pub mod types;

use std::ffi::CStr;
use std::os::raw::c_char;
use std::panic::catch_unwind;

use munki_facts_core::{Fact, FactsConfig, HostInfo};

use types::*;

// ---------------------------------------------------------------------------
// Registry lifecycle
// ---------------------------------------------------------------------------

/// Create a registry using the stock Munki paths.
///
/// The caller must free the returned pointer with `munki_facts_registry_free`.
#[unsafe(no_mangle)]
pub extern "C" fn munki_facts_registry_new() -> *mut FfiFactRegistry {
    catch_unwind(|| {
        let inner = munki_facts_core::FactRegistry::new(FactsConfig::default());
        Box::into_raw(Box::new(FfiFactRegistry { inner }))
    })
    .unwrap_or(std::ptr::null_mut())
}

/// Create a registry with overridden tool paths. Any argument may be null
/// to keep its default.
#[unsafe(no_mangle)]
pub extern "C" fn munki_facts_registry_with_paths(
    defaults_bin: *const c_char,
    preferences: *const c_char,
    msu_bin: *const c_char,
) -> *mut FfiFactRegistry {
    catch_unwind(|| {
        let mut config = FactsConfig::default();
        if !defaults_bin.is_null() {
            config = config.with_defaults_bin(unsafe { borrow_str(defaults_bin) });
        }
        if !preferences.is_null() {
            config = config.with_preferences(unsafe { borrow_str(preferences) });
        }
        if !msu_bin.is_null() {
            config = config.with_msu_bin(unsafe { borrow_str(msu_bin) });
        }
        let inner = munki_facts_core::FactRegistry::new(config);
        Box::into_raw(Box::new(FfiFactRegistry { inner }))
    })
    .unwrap_or(std::ptr::null_mut())
}

/// Free a registry created by `munki_facts_registry_new*`. Safe to call with null.
#[unsafe(no_mangle)]
pub extern "C" fn munki_facts_registry_free(registry: *mut FfiFactRegistry) {
    if !registry.is_null() {
        let _ = catch_unwind(|| {
            drop(unsafe { Box::from_raw(registry) });
        });
    }
}

// ---------------------------------------------------------------------------
// Registration info
// ---------------------------------------------------------------------------

/// Number of facts the registry provides.
#[unsafe(no_mangle)]
pub extern "C" fn munki_facts_count(registry: *const FfiFactRegistry) -> u32 {
    if registry.is_null() {
        return 0;
    }
    let registry = unsafe { &*registry };
    registry.inner.facts().len() as u32
}

/// Static name of the fact at `index`, or null when out of range.
/// The returned string must not be freed.
#[unsafe(no_mangle)]
pub extern "C" fn munki_facts_name(registry: *const FfiFactRegistry, index: u32) -> *const c_char {
    if registry.is_null() {
        return std::ptr::null();
    }
    let registry = unsafe { &*registry };
    match registry.inner.facts().get(index as usize) {
        Some(fact) => static_name(*fact).as_ptr(),
        None => std::ptr::null(),
    }
}

fn static_name(fact: Fact) -> &'static CStr {
    match fact {
        Fact::MunkiHttpHeaders => c"munki_http_headers",
        Fact::MunkiClientVersion => c"munki_client_version",
    }
}

/// Whether `fact_name` should be resolved on a host whose kernel is `kernel`.
///
/// Returns 1 when it applies, 0 when it is confined out, and -1 for a null
/// argument or an unknown fact.
#[unsafe(no_mangle)]
pub extern "C" fn munki_facts_applies(
    registry: *const FfiFactRegistry,
    fact_name: *const c_char,
    kernel: *const c_char,
) -> i32 {
    catch_unwind(|| {
        if registry.is_null() || fact_name.is_null() || kernel.is_null() {
            return -1;
        }
        let registry = unsafe { &*registry };
        let name = unsafe { borrow_str(fact_name) };
        let host = HostInfo::new(unsafe { borrow_str(kernel) });
        match registry.inner.lookup(name) {
            Ok(fact) => i32::from(registry.inner.applies_to(fact, &host)),
            Err(_) => -1,
        }
    })
    .unwrap_or(-1)
}

// ---------------------------------------------------------------------------
// Build / parse
// ---------------------------------------------------------------------------

/// Build the command that resolves `fact_name`.
///
/// Returns null if an argument is null or the fact is unknown.
/// The caller must free the returned pointer with `munki_facts_free_request`.
#[unsafe(no_mangle)]
pub extern "C" fn munki_facts_build_request(
    registry: *const FfiFactRegistry,
    fact_name: *const c_char,
) -> *mut FfiCommandRequest {
    catch_unwind(|| {
        if registry.is_null() || fact_name.is_null() {
            return std::ptr::null_mut();
        }
        let registry = unsafe { &*registry };
        let name = unsafe { borrow_str(fact_name) };
        match registry.inner.lookup(name) {
            Ok(fact) => FfiCommandRequest::from_core(registry.inner.build_request(fact)),
            Err(_) => std::ptr::null_mut(),
        }
    })
    .unwrap_or(std::ptr::null_mut())
}

/// Parse the output of the command built for `fact_name`.
///
/// Always returns a result; check `error_code` before reading `json`.
#[unsafe(no_mangle)]
pub extern "C" fn munki_facts_parse_output(
    registry: *const FfiFactRegistry,
    fact_name: *const c_char,
    output: *const FfiCommandOutput,
) -> *mut FfiFactResult {
    catch_unwind(|| {
        if registry.is_null() {
            return FfiFactResult::null_arg("registry");
        }
        if fact_name.is_null() {
            return FfiFactResult::null_arg("fact_name");
        }
        if output.is_null() {
            return FfiFactResult::null_arg("output");
        }
        let registry = unsafe { &*registry };
        let name = unsafe { borrow_str(fact_name) };
        let output = unsafe { &*output }.to_core();
        match registry.inner.lookup(name) {
            Ok(fact) => FfiFactResult::from_value(registry.inner.parse_output(fact, &output)),
            Err(e) => FfiFactResult::from_error(e),
        }
    })
    .unwrap_or_else(|_| FfiFactResult::panic("panic in munki_facts_parse_output"))
}

// ---------------------------------------------------------------------------
// Free functions
// ---------------------------------------------------------------------------

/// Free an `FfiCommandRequest` returned by `munki_facts_build_request`.
/// Safe to call with null.
#[unsafe(no_mangle)]
pub extern "C" fn munki_facts_free_request(req: *mut FfiCommandRequest) {
    if req.is_null() {
        return;
    }
    let _ = catch_unwind(|| {
        let req = unsafe { Box::from_raw(req) };
        req.free_fields();
    });
}

/// Free an `FfiFactResult` returned by `munki_facts_parse_output`.
/// Safe to call with null.
#[unsafe(no_mangle)]
pub extern "C" fn munki_facts_free_result(result: *mut FfiFactResult) {
    if result.is_null() {
        return;
    }
    let _ = catch_unwind(|| {
        let result = unsafe { Box::from_raw(result) };
        free_c_string(result.error_message);
        free_c_string(result.json);
    });
}

// ---------------------------------------------------------------------------
// Unit tests
// ---------------------------------------------------------------------------
