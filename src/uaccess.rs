//! Caller buffer access
//!
//! The engine never touches caller memory directly. Every byte moving in or
//! out of a device goes through [`UserSource`] (data to be written) or
//! [`UserSink`] (space for data being read), either of which may fault.
//! Slices and arrays implement both; tests and embedders supply their own
//! implementations to model buffers that fail mid-transfer.

use crate::error::{Result, ScullError};

/// A caller-provided buffer that data is copied *from* on write
pub trait UserSource {
    /// Number of bytes available to copy
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Copy the first `dst.len()` bytes of the buffer into `dst`
    fn copy_from_user(&self, dst: &mut [u8]) -> Result<()>;
}

/// A caller-provided buffer that data is copied *into* on read
pub trait UserSink {
    /// Number of bytes the buffer can accept
    fn capacity(&self) -> usize;

    /// Copy `src` into the start of the buffer
    fn copy_to_user(&mut self, src: &[u8]) -> Result<()>;
}

impl UserSource for [u8] {
    fn len(&self) -> usize {
        <[u8]>::len(self)
    }

    fn copy_from_user(&self, dst: &mut [u8]) -> Result<()> {
        let src = self.get(..dst.len()).ok_or_else(|| {
            ScullError::TransferFault(format!(
                "source holds {} bytes, {} requested",
                <[u8]>::len(self),
                dst.len()
            ))
        })?;
        dst.copy_from_slice(src);
        Ok(())
    }
}

impl UserSource for Vec<u8> {
    fn len(&self) -> usize {
        Vec::len(self)
    }

    fn copy_from_user(&self, dst: &mut [u8]) -> Result<()> {
        self.as_slice().copy_from_user(dst)
    }
}

impl<const N: usize> UserSource for [u8; N] {
    fn len(&self) -> usize {
        N
    }

    fn copy_from_user(&self, dst: &mut [u8]) -> Result<()> {
        self.as_slice().copy_from_user(dst)
    }
}

impl UserSink for [u8] {
    fn capacity(&self) -> usize {
        self.len()
    }

    fn copy_to_user(&mut self, src: &[u8]) -> Result<()> {
        let capacity = self.len();
        let dst = self.get_mut(..src.len()).ok_or_else(|| {
            ScullError::TransferFault(format!(
                "destination holds {} bytes, {} supplied",
                capacity,
                src.len()
            ))
        })?;
        dst.copy_from_slice(src);
        Ok(())
    }
}

impl<const N: usize> UserSink for [u8; N] {
    fn capacity(&self) -> usize {
        N
    }

    fn copy_to_user(&mut self, src: &[u8]) -> Result<()> {
        self.as_mut_slice().copy_to_user(src)
    }
}
