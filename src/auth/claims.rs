use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// JWT payload: who the caller is and where they were at registration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub sub: Uuid,      // user ID
    pub latitude: f64,  // location at issue time
    pub longitude: f64, // location at issue time
    pub iat: usize,     // issued at (unix timestamp)
    pub exp: usize,     // expires at (unix timestamp)
    pub iss: String,    // issuer
    pub aud: String,    // audience
}
