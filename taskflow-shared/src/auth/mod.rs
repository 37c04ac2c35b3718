/// Authentication utilities
///
/// This module provides the authentication primitives for Task Flow:
///
/// # Modules
///
/// - [`password`]: Argon2id password hashing and the password policy
/// - [`jwt`]: JWT token generation and validation
/// - [`middleware`]: Bearer token extraction and resolution to a user
///
/// # Security Features
///
/// - **Password Hashing**: Argon2id with 19 MiB memory, 2 iterations
/// - **JWT Tokens**: HS256 signing, 30 minute default lifetime
/// - **Uniform failures**: every token problem surfaces as the same 401
///
/// # Example
///
/// ```
/// use taskflow_shared::auth::password::{hash_password, verify_password};
/// use taskflow_shared::auth::jwt::{create_token, validate_token, Claims};
/// use chrono::Duration;
///
/// # fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let hash = hash_password("user_password")?;
/// assert!(verify_password("user_password", &hash)?);
///
/// let claims = Claims::new("user@example.com", Duration::minutes(30));
/// let token = create_token(&claims, "secret-key-at-least-32-bytes-long")?;
/// # Ok(())
/// # }
/// ```

pub mod jwt;
pub mod middleware;
pub mod password;
