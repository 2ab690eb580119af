//Copyright 2026 gkeyring Developers
//
// Licensed under the Apache License, Version 2.0, <LICENSE-APACHE or
// http://apache.org/licenses/LICENSE-2.0> or the MIT license <LICENSE-MIT or
// http://opensource.org/licenses/MIT>, at your option. This file may not be
// copied, modified, or distributed except according to those terms.

// Key agreement and secret transport for `dh-ietf1024-sha256-aes128-cbc-pkcs7`:
// our public key goes out with OpenSession, the server's comes back as the
// session output, HKDF-SHA256 turns the shared secret into an AES-128 key,
// and every secret carries its own IV in `parameters`.

use crate::error::Error;

use aes::cipher::block_padding::Pkcs7;
use aes::cipher::{BlockDecryptMut, BlockEncryptMut, KeyIvInit};
use generic_array::{typenum::U16, GenericArray};
use hkdf::Hkdf;
use num::bigint::BigUint;
use once_cell::sync::Lazy;
use sha2::Sha256;

pub(crate) type AesKey = GenericArray<u8, U16>;

type Aes128CbcEnc = cbc::Encryptor<aes::Aes128>;
type Aes128CbcDec = cbc::Decryptor<aes::Aes128>;

const KEY_BYTES: usize = 128;
pub(crate) const IV_BYTES: usize = 16;

// RFC 2409 second Oakley group
static DH_GENERATOR: Lazy<BigUint> = Lazy::new(|| BigUint::from(2u32));
static DH_PRIME: Lazy<BigUint> = Lazy::new(|| {
    BigUint::from_bytes_be(&[
        0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xC9, 0x0F, 0xDA, 0xA2, 0x21, 0x68, 0xC2,
        0x34, 0xC4, 0xC6, 0x62, 0x8B, 0x80, 0xDC, 0x1C, 0xD1, 0x29, 0x02, 0x4E, 0x08, 0x8A, 0x67,
        0xCC, 0x74, 0x02, 0x0B, 0xBE, 0xA6, 0x3B, 0x13, 0x9B, 0x22, 0x51, 0x4A, 0x08, 0x79, 0x8E,
        0x34, 0x04, 0xDD, 0xEF, 0x95, 0x19, 0xB3, 0xCD, 0x3A, 0x43, 0x1B, 0x30, 0x2B, 0x0A, 0x6D,
        0xF2, 0x5F, 0x14, 0x37, 0x4F, 0xE1, 0x35, 0x6D, 0x6D, 0x51, 0xC2, 0x45, 0xE4, 0x85, 0xB5,
        0x76, 0x62, 0x5E, 0x7E, 0xC6, 0xF4, 0x4C, 0x42, 0xE9, 0xA6, 0x37, 0xED, 0x6B, 0x0B, 0xFF,
        0x5C, 0xB6, 0xF4, 0x06, 0xB7, 0xED, 0xEE, 0x38, 0x6B, 0xFB, 0x5A, 0x89, 0x9F, 0xA5, 0xAE,
        0x9F, 0x24, 0x11, 0x7C, 0x4B, 0x1F, 0xE6, 0x49, 0x28, 0x66, 0x51, 0xEC, 0xE6, 0x53, 0x81,
        0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF,
    ])
});

pub(crate) struct Keypair {
    private: BigUint,
    public: BigUint,
}

impl Keypair {
    pub(crate) fn generate() -> Result<Self, Error> {
        let mut private_bytes = [0; KEY_BYTES];
        getrandom::getrandom(&mut private_bytes)
            .map_err(|_| Error::Crypto("could not gather randomness for key exchange"))?;

        let private = BigUint::from_bytes_be(&private_bytes);
        let public = DH_GENERATOR.modpow(&private, &DH_PRIME);

        Ok(Keypair { private, public })
    }

    pub(crate) fn public_bytes(&self) -> Vec<u8> {
        self.public.to_bytes_be()
    }

    /// AES key shared with whoever owns `server_public`.
    pub(crate) fn derive_key(&self, server_public: &[u8]) -> Result<AesKey, Error> {
        let server_public = BigUint::from_bytes_be(server_public);
        let shared = server_public.modpow(&self.private, &DH_PRIME);

        // left-pad to the group size before hashing
        let shared = shared.to_bytes_be();
        let mut ikm = vec![0; KEY_BYTES.saturating_sub(shared.len())];
        ikm.extend_from_slice(&shared);

        let (_, hk) = Hkdf::<Sha256>::extract(None, &ikm);
        let mut okm = [0; IV_BYTES];
        hk.expand(&[], &mut okm)
            .map_err(|_| Error::Crypto("key derivation failed"))?;

        Ok(GenericArray::clone_from_slice(&okm))
    }
}

pub(crate) fn random_iv() -> Result<[u8; IV_BYTES], Error> {
    let mut iv = [0; IV_BYTES];
    getrandom::getrandom(&mut iv).map_err(|_| Error::Crypto("could not gather randomness for iv"))?;
    Ok(iv)
}

pub(crate) fn encrypt(data: &[u8], key: &AesKey, iv: &[u8; IV_BYTES]) -> Vec<u8> {
    Aes128CbcEnc::new(key, GenericArray::from_slice(iv)).encrypt_padded_vec_mut::<Pkcs7>(data)
}

pub(crate) fn decrypt(data: &[u8], key: &AesKey, iv: &[u8]) -> Result<Vec<u8>, Error> {
    if iv.len() != IV_BYTES {
        return Err(Error::Crypto("secret parameters are not an aes iv"));
    }

    Aes128CbcDec::new(key, GenericArray::from_slice(iv))
        .decrypt_padded_vec_mut::<Pkcs7>(data)
        .map_err(|_| Error::Crypto("message decryption failed"))
}
