use serde::{Deserialize, Serialize};

/// JWT claims. `sub` carries the account email; a payload without it is
/// rejected by the token service.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    #[serde(default)]
    pub sub: String,
    pub iat: i64,
    pub exp: i64,
}
