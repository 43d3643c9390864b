/// Credential verification: "verify credential, obtain identity"
///
/// - `password`: Argon2id hashing and verification
/// - `jwt`: HS256 access/refresh token issue and validation
///
/// The HTTP layer resolves a validated token's subject to a live user
/// through the store; the core only ever sees the resulting identity.

pub mod jwt;
pub mod password;
