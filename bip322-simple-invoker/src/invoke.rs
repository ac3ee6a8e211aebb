//! The call across the C ABI into the signer.
//!
//! Every buffer handed to or received from the foreign routine is owned by a
//! scoped value, so it is released on success and on every error path.

use crate::{config::AddressType, error::InvokerError};
use bip322_simple_signer::ffi::{
    free_string, get_last_error, signature_with_wif_segwit, signature_with_wif_taproot,
};
use libc::c_char;
use std::ffi::{CStr, CString};
use std::ptr::NonNull;
use zeroize::Zeroize;

/// C signature shared by the foreign signing routines.
pub type SignFn = unsafe extern "C" fn(*const c_char, *const c_char) -> *mut c_char;

impl AddressType {
    fn routine(self) -> SignFn {
        match self {
            AddressType::Segwit => signature_with_wif_segwit,
            AddressType::Taproot => signature_with_wif_taproot,
        }
    }
}

/// Null-terminated copy of a secret, wiped when dropped.
struct SecretBuffer(CString);

impl SecretBuffer {
    fn new(secret: &str, name: &'static str) -> Result<Self, InvokerError> {
        match CString::new(secret) {
            Ok(buf) => Ok(Self(buf)),
            Err(e) => {
                e.into_vec().zeroize();
                Err(InvokerError::InteriorNul(name))
            }
        }
    }

    fn as_ptr(&self) -> *const c_char {
        self.0.as_ptr()
    }
}

impl Drop for SecretBuffer {
    fn drop(&mut self) {
        std::mem::take(&mut self.0).into_bytes_with_nul().zeroize();
    }
}

/// A string allocated by the signer, released through `free_string` on drop.
struct ForeignString(NonNull<c_char>);

impl ForeignString {
    /// Takes ownership of `ptr`, or returns `None` for the null failure sentinel.
    ///
    /// # Safety
    /// `ptr` must be null or a string returned by a signer routine that is not owned elsewhere.
    unsafe fn from_raw(ptr: *mut c_char) -> Option<Self> {
        NonNull::new(ptr).map(Self)
    }

    fn to_str(&self) -> Result<&str, InvokerError> {
        unsafe { CStr::from_ptr(self.0.as_ptr()) }
            .to_str()
            .map_err(|_| InvokerError::InvalidUtf8)
    }
}

impl Drop for ForeignString {
    fn drop(&mut self) {
        unsafe { free_string(self.0.as_ptr()) };
    }
}

fn last_signer_error() -> String {
    let ptr = get_last_error();
    if ptr.is_null() {
        return "unknown error".to_string();
    }
    unsafe { CStr::from_ptr(ptr) }.to_string_lossy().into_owned()
}

/// Signs `message` with `wif` through the foreign routine for `address_type`.
pub fn invoke(address_type: AddressType, message: &str, wif: &str) -> Result<String, InvokerError> {
    invoke_with(address_type.routine(), message, wif)
}

/// Calls `routine` with null-terminated copies of `message` and `wif`.
///
/// A non-null result must come from the signer's allocator, since it is
/// released with `free_string`.
pub fn invoke_with(routine: SignFn, message: &str, wif: &str) -> Result<String, InvokerError> {
    let message_buf = CString::new(message).map_err(|_| InvokerError::InteriorNul("message"))?;
    let key_buf = SecretBuffer::new(wif, "key")?;

    let result = unsafe { ForeignString::from_raw(routine(message_buf.as_ptr(), key_buf.as_ptr())) }
        .ok_or_else(|| InvokerError::Signer(last_signer_error()))?;

    Ok(result.to_str()?.to_owned())
}

/// Formats the line printed for a successful signature.
pub fn result_line(signature: &str) -> String {
    format!("Result: {}", signature)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::ptr;

    unsafe extern "C" fn null_routine(_: *const c_char, _: *const c_char) -> *mut c_char {
        ptr::null_mut()
    }

    unsafe extern "C" fn non_utf8_routine(_: *const c_char, _: *const c_char) -> *mut c_char {
        CString::new(vec![0xffu8, 0xfe]).unwrap().into_raw()
    }

    unsafe extern "C" fn echo_routine(message: *const c_char, _: *const c_char) -> *mut c_char {
        CStr::from_ptr(message).to_owned().into_raw()
    }

    #[test]
    fn test_null_without_signer_error_is_unknown() {
        // Fresh thread, so the signer's thread-local error slot is empty.
        let err = std::thread::spawn(|| invoke_with(null_routine, "test", "key").unwrap_err())
            .join()
            .unwrap();
        match err {
            InvokerError::Signer(reason) => assert_eq!(reason, "unknown error"),
            other => panic!("expected a signer error, got {:?}", other),
        }
    }

    #[test]
    fn test_non_utf8_result_is_rejected() {
        let err = invoke_with(non_utf8_routine, "test", "key").unwrap_err();
        assert!(matches!(err, InvokerError::InvalidUtf8));
        assert_eq!(
            err.to_string(),
            "signer returned a string that is not valid UTF-8"
        );
    }

    #[test]
    fn test_buffers_are_null_terminated_copies() {
        let result = invoke_with(echo_routine, "hello world", "key").unwrap();
        assert_eq!(result, "hello world");
    }

    #[test]
    fn test_result_line() {
        assert_eq!(result_line("abc="), "Result: abc=");
    }
}
