//! # FFI interface for bip322-simple-signer
//!
//! This module provides a C-compatible API for producing BIP-322 simple
//! signatures from non-Rust environments.
//!
//! ## Memory and Lifetime
//! - Input strings are borrowed for the duration of the call only; the caller keeps ownership.
//! - Every non-null string returned by a signing function is owned by the caller
//!   and must be released with [`free_string`].
//!
//! ## Error Handling
//! - Signing functions report failure by returning `NULL` and storing the error string internally.
//! - Use [`get_last_error`] to retrieve a null-terminated error string for the last failure in the current thread.
//! - A panic inside the signer is caught and reported as a failure; it never unwinds into the caller.
//!
//! ## Example
//! ```c
//! char* sig = signature_with_wif_segwit("test", wif);
//! if (sig == NULL) {
//!     fprintf(stderr, "%s\n", get_last_error());
//! } else {
//!     printf("Result: %s\n", sig);
//!     free_string(sig);
//! }
//! ```

use crate::{error::SignerError, sign::sign_simple, wallet::AddressKind};
use libc::c_char;
use std::cell::RefCell;
use std::ffi::{CStr, CString};
use std::panic::{self, AssertUnwindSafe};
use std::ptr;

thread_local! {
    static LAST_ERROR: RefCell<Option<CString>> = const { RefCell::new(None) };
}

fn set_last_error(s: impl Into<String>) {
    let error_str = s.into();
    if let Ok(c_string) = CString::new(error_str) {
        LAST_ERROR.with(|cell| cell.borrow_mut().replace(c_string));
    }
}

/// Returns the last error string for the current thread.
///
/// # Safety
/// - Returns a pointer to a thread-local C string owned by the library.
/// - The pointer remains valid until the next failing FFI call on the same thread.
///
/// # Returns
/// - `NULL` if no error has occurred yet.
/// - Non-null pointer to a null-terminated UTF-8 string otherwise.
#[no_mangle]
pub extern "C" fn get_last_error() -> *const c_char {
    LAST_ERROR.with(|cell| cell.borrow().as_ref().map_or(ptr::null(), |s| s.as_ptr()))
}

unsafe fn borrow_str<'a>(ptr: *const c_char, name: &'static str) -> Result<&'a str, SignerError> {
    if ptr.is_null() {
        return Err(SignerError::NullPointer(name));
    }
    Ok(CStr::from_ptr(ptr).to_str()?)
}

unsafe fn sign_to_c_string(
    message: *const c_char,
    wif: *const c_char,
    kind: AddressKind,
) -> *mut c_char {
    let outcome = panic::catch_unwind(AssertUnwindSafe(|| -> Result<CString, SignerError> {
        let message = borrow_str(message, "message")?;
        let wif = borrow_str(wif, "wif")?;
        let signature = sign_simple(message, wif, kind)?;
        Ok(CString::new(signature)?)
    }))
    .unwrap_or(Err(SignerError::Panic));

    match outcome {
        Ok(signature) => signature.into_raw(),
        Err(e) => {
            tracing::warn!(%kind, error = %e, "BIP-322 signing failed");
            set_last_error(e.to_string());
            ptr::null_mut()
        }
    }
}

/// Signs `message` with the WIF key `wif` for its native SegWit (P2WPKH) address.
///
/// # Safety
/// - `message` and `wif` must be null or point to valid null-terminated strings.
///
/// # Returns
/// - Pointer to a null-terminated base64 signature, to be released with [`free_string`].
/// - `NULL` if an argument is null or not UTF-8, or the key cannot be decoded.
#[no_mangle]
pub unsafe extern "C" fn signature_with_wif_segwit(
    message: *const c_char,
    wif: *const c_char,
) -> *mut c_char {
    sign_to_c_string(message, wif, AddressKind::NativeSegwit)
}

/// Signs `message` with the WIF key `wif` for its Taproot (P2TR key-path) address.
///
/// # Safety
/// - `message` and `wif` must be null or point to valid null-terminated strings.
///
/// # Returns
/// - Pointer to a null-terminated base64 signature, to be released with [`free_string`].
/// - `NULL` on failure; see [`get_last_error`].
#[no_mangle]
pub unsafe extern "C" fn signature_with_wif_taproot(
    message: *const c_char,
    wif: *const c_char,
) -> *mut c_char {
    sign_to_c_string(message, wif, AddressKind::Taproot)
}

/// Frees a string previously returned by a signing function.
///
/// # Safety
/// - `ptr` must be null or a pointer returned by [`signature_with_wif_segwit`]
///   or [`signature_with_wif_taproot`] that has not been freed yet.
///
/// # Notes
/// - Passing `NULL` is a no-op.
#[no_mangle]
pub unsafe extern "C" fn free_string(ptr: *mut c_char) {
    if ptr.is_null() {
        return;
    }
    drop(CString::from_raw(ptr));
}
