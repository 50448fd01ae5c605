//! Argon2id key derivation with versioned, envelope-recorded parameters.
//!
//! Grounded on the teacher's `commands::backup::encrypt_content`, which
//! hardcodes `Params::new(65536, 3, 1, Some(32))`. Spec.md §4.1 calls for
//! 4 lanes of parallelism rather than the teacher's 1 — this crate follows
//! spec.md since the Secret Core's defaults are the ones callers will rely
//! on going forward (see SPEC_FULL.md §4.1 note).

use crate::error::{CoreError, CoreResult};
use argon2::{Algorithm, Argon2, Params, Version};
use serde::{Deserialize, Serialize};

/// Memory-hard KDF parameters, recorded verbatim in every envelope so a
/// future decryptor never needs out-of-band configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct KdfParams {
    /// Memory cost in KiB.
    pub memory_kib: u32,
    /// Time cost (iteration count).
    pub iterations: u32,
    /// Degree of parallelism (lanes).
    pub parallelism: u32,
    /// Output key length in bytes.
    pub output_len: usize,
}

/// The OWASP-floor defaults spec.md requires: 64 MiB, 3 iterations, 4
/// lanes, 32-byte output.
pub const DEFAULT_KDF_PARAMS: KdfParams = KdfParams {
    memory_kib: 65_536,
    iterations: 3,
    parallelism: 4,
    output_len: 32,
};

pub fn derive(password: &str, salt: &[u8], params: &KdfParams) -> CoreResult<[u8; 32]> {
    let argon2_params = Params::new(
        params.memory_kib,
        params.iterations,
        params.parallelism,
        Some(params.output_len),
    )
    .map_err(|_| CoreError::AuthenticationFailed)?;

    let argon2 = Argon2::new(Algorithm::Argon2id, Version::V0x13, argon2_params);

    let mut out = [0u8; 32];
    argon2
        .hash_password_into(password.as_bytes(), salt, &mut out)
        .map_err(|_| CoreError::AuthenticationFailed)?;

    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deterministic_for_same_inputs() {
        let salt = [7u8; 32];
        let a = derive("pw", &salt, &DEFAULT_KDF_PARAMS).unwrap();
        let b = derive("pw", &salt, &DEFAULT_KDF_PARAMS).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn different_salt_different_key() {
        let a = derive("pw", &[1u8; 32], &DEFAULT_KDF_PARAMS).unwrap();
        let b = derive("pw", &[2u8; 32], &DEFAULT_KDF_PARAMS).unwrap();
        assert_ne!(a, b);
    }
}
