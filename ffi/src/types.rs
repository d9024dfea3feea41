//! `#[repr(C)]` types for the FFI boundary.
//!
//! # Design
//! Each type mirrors a core type with C-compatible representations:
//! `*mut c_char` instead of `String`, pointer plus length instead of `Vec`,
//! and enums with explicit discriminants. Fact values cross as JSON text so
//! the C side needs no per-fact struct layout. Conversion functions live here
//! to keep `lib.rs` focused on the `extern "C"` surface.

use std::ffi::{CStr, CString};
use std::os::raw::c_char;

use munki_facts_core::{CommandOutput, CommandRequest, FactError, FactValue};

/// Opaque handle to a `FactRegistry`. C callers receive a pointer to this
/// and pass it back into every FFI function.
pub struct FfiFactRegistry {
    pub(crate) inner: munki_facts_core::FactRegistry,
}

/// Copy `s` into a heap C string owned by the caller. Interior NULs cannot
/// occur in paths or parsed fact text; if one does, the string comes back empty.
pub(crate) fn c_string(s: impl Into<Vec<u8>>) -> *mut c_char {
    CString::new(s).unwrap_or_default().into_raw()
}

/// Borrow a caller-provided C string, treating invalid UTF-8 as empty.
///
/// # Safety
/// `ptr` must be non-null and point at a NUL-terminated string.
pub(crate) unsafe fn borrow_str<'a>(ptr: *const c_char) -> &'a str {
    unsafe { CStr::from_ptr(ptr) }.to_str().unwrap_or("")
}

/// Release a C string created by `c_string`. Null is ignored.
pub(crate) fn free_c_string(ptr: *mut c_char) {
    if !ptr.is_null() {
        drop(unsafe { CString::from_raw(ptr) });
    }
}

// ---------------------------------------------------------------------------
// Command request (we allocate, caller frees)
// ---------------------------------------------------------------------------

/// A process invocation described as C-compatible plain data.
///
/// `args` holds `args_len` C strings and does not include `program`.
/// Null when `args_len` is 0.
#[repr(C)]
pub struct FfiCommandRequest {
    pub program: *mut c_char,
    pub args: *mut *mut c_char,
    pub args_len: u32,
}

impl FfiCommandRequest {
    /// Convert a core `CommandRequest` into a heap-allocated `FfiCommandRequest`.
    pub(crate) fn from_core(req: CommandRequest) -> *mut Self {
        let args_len = req.args.len() as u32;
        let args = if req.args.is_empty() {
            std::ptr::null_mut()
        } else {
            let args: Box<[*mut c_char]> = req.args.into_iter().map(c_string).collect();
            Box::into_raw(args) as *mut *mut c_char
        };
        Box::into_raw(Box::new(FfiCommandRequest {
            program: c_string(req.program),
            args,
            args_len,
        }))
    }

    /// Release the fields of a request built by `from_core` (not the struct itself).
    pub(crate) fn free_fields(&self) {
        free_c_string(self.program);
        if !self.args.is_null() && self.args_len > 0 {
            let args = unsafe {
                Box::from_raw(std::ptr::slice_from_raw_parts_mut(self.args, self.args_len as usize))
            };
            for &arg in args.iter() {
                free_c_string(arg);
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Command output (caller-provided, not heap-allocated by us)
// ---------------------------------------------------------------------------

/// Captured output of a command the C caller ran.
///
/// Built on the caller's stack. `exit_status` is read only when
/// `has_exit_status` is true. A null `stdout` means nothing was captured.
/// The FFI layer reads but does not free these fields.
#[repr(C)]
pub struct FfiCommandOutput {
    pub has_exit_status: bool,
    pub exit_status: i32,
    pub stdout: *const c_char,
}

impl FfiCommandOutput {
    pub(crate) fn to_core(&self) -> CommandOutput {
        let stdout = if self.stdout.is_null() {
            String::new()
        } else {
            unsafe { CStr::from_ptr(self.stdout) }
                .to_string_lossy()
                .into_owned()
        };
        CommandOutput {
            status: self.has_exit_status.then_some(self.exit_status),
            stdout,
        }
    }
}

// ---------------------------------------------------------------------------
// Result types
// ---------------------------------------------------------------------------

/// Error codes returned in `FfiFactResult`.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FfiErrorCode {
    Ok = 0,
    UnknownFact = 1,
    Serialization = 2,
    Spawn = 3,
    Panic = 4,
    NullArg = 5,
}

/// Shape of the JSON carried in `FfiFactResult::json`.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FfiValueKind {
    None = 0,
    /// A JSON array of header strings.
    Headers = 1,
    /// A JSON object with `full`, `major`, `minor`, `patch`.
    Version = 2,
}

/// Result envelope for `munki_facts_parse_output`.
///
/// On success `error_code` is `Ok`, `error_message` is null, and `json`
/// holds the fact value. On failure `error_message` is a human-readable
/// C string, `kind` is `None` and `json` is null.
#[repr(C)]
pub struct FfiFactResult {
    pub error_code: FfiErrorCode,
    pub error_message: *mut c_char,
    pub kind: FfiValueKind,
    pub json: *mut c_char,
}

impl FfiFactResult {
    fn boxed(error_code: FfiErrorCode, error_message: *mut c_char, kind: FfiValueKind, json: *mut c_char) -> *mut Self {
        Box::into_raw(Box::new(FfiFactResult {
            error_code,
            error_message,
            kind,
            json,
        }))
    }

    /// Build a success result, or a serialization error if the value
    /// cannot be rendered.
    pub(crate) fn from_value(value: FactValue) -> *mut Self {
        let kind = match value {
            FactValue::Headers(_) => FfiValueKind::Headers,
            FactValue::Version(_) => FfiValueKind::Version,
        };
        match value.to_json() {
            Ok(json) => Self::boxed(FfiErrorCode::Ok, std::ptr::null_mut(), kind, c_string(json)),
            Err(e) => Self::from_error(e),
        }
    }

    /// Build an error result from a `FactError`.
    pub(crate) fn from_error(err: FactError) -> *mut Self {
        let code = match err {
            FactError::UnknownFact(_) => FfiErrorCode::UnknownFact,
            FactError::Serialization(_) => FfiErrorCode::Serialization,
            FactError::Spawn { .. } => FfiErrorCode::Spawn,
        };
        Self::boxed(code, c_string(err.to_string()), FfiValueKind::None, std::ptr::null_mut())
    }

    /// Build an error result for a null argument.
    pub(crate) fn null_arg(name: &str) -> *mut Self {
        Self::boxed(
            FfiErrorCode::NullArg,
            c_string(format!("null argument: {name}")),
            FfiValueKind::None,
            std::ptr::null_mut(),
        )
    }

    /// Build an error result for a caught panic.
    pub(crate) fn panic(msg: &str) -> *mut Self {
        Self::boxed(FfiErrorCode::Panic, c_string(msg), FfiValueKind::None, std::ptr::null_mut())
    }
}
