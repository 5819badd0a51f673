use crate::AuthError;
use argon2::{
    Argon2,
    PasswordHash,
    PasswordHasher,
    PasswordVerifier,
    password_hash::SaltString,
};
use rand_core::OsRng;
use subtle::ConstantTimeEq;

pub fn hash_password(password: &str) -> Result<String, AuthError> {
    let salt = SaltString::generate(&mut OsRng);
    let argon2 = Argon2::default();
    let hash = argon2
        .hash_password(password.as_bytes(), &salt)
        .map_err(|err| AuthError::Internal(err.to_string()))?;
    Ok(hash.to_string())
}

/// 校验口令。存量数据里可能还有明文口令（早期部署遗留），
/// 非 argon2 前缀的存储值按明文常量时间比较。
pub fn verify_password(stored: &str, password: &str) -> Result<bool, AuthError> {
    if stored.starts_with("$argon2") {
        let parsed = PasswordHash::new(stored).map_err(|err| AuthError::Internal(err.to_string()))?;
        let argon2 = Argon2::default();
        return Ok(argon2.verify_password(password.as_bytes(), &parsed).is_ok());
    }
    Ok(stored.as_bytes().ct_eq(password.as_bytes()).into())
}
