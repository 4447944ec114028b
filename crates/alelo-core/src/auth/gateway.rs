use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{EncodingKey, Header};
use serde::{Deserialize, Serialize};

use crate::error::Result;

/// HMAC key the Meu Alelo web frontend signs its gateway tokens with.
/// The gateway only accepts tokens signed with this exact value, so it is a
/// compatibility requirement rather than a secret this tool protects.
const GATEWAY_SECRET: &str = "<hb(yk%YK8s{tw6T";

const GATEWAY_ISSUER: &str = "meualelo.alelo.com.br";
const GATEWAY_SUBJECT: &str = "meualelo";
const GATEWAY_FINGERPRINT: &str = "fe2ae307aceb5898dd89799241a55676";
const GATEWAY_SOURCE: &str = "WEB";

/// Token lifetime in hours
const GATEWAY_TOKEN_TTL_HOURS: i64 = 24;

#[derive(Debug, Serialize, Deserialize)]
pub(crate) struct GatewayClaims {
    pub iss: String,
    pub sub: String,
    pub exp: i64,
    pub fnp: String,
    pub src: String,
}

/// Builds the HS256 JWT sent as the `X-api-key` header.
#[derive(Debug, Clone, Copy, Default)]
pub struct GatewayTokenGenerator;

impl GatewayTokenGenerator {
    pub fn new() -> Self {
        Self
    }

    pub fn generate(&self) -> Result<String> {
        self.generate_at(Utc::now())
    }

    pub fn generate_at(&self, now: DateTime<Utc>) -> Result<String> {
        let claims = GatewayClaims {
            iss: GATEWAY_ISSUER.to_string(),
            sub: GATEWAY_SUBJECT.to_string(),
            exp: (now + Duration::hours(GATEWAY_TOKEN_TTL_HOURS)).timestamp(),
            fnp: GATEWAY_FINGERPRINT.to_string(),
            src: GATEWAY_SOURCE.to_string(),
        };

        let token = jsonwebtoken::encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(GATEWAY_SECRET.as_bytes()),
        )?;
        Ok(token)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use jsonwebtoken::{decode, decode_header, Algorithm, DecodingKey, Validation};

    fn decode_claims(token: &str) -> GatewayClaims {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.set_issuer(&[GATEWAY_ISSUER]);
        decode::<GatewayClaims>(
            token,
            &DecodingKey::from_secret(GATEWAY_SECRET.as_bytes()),
            &validation,
        )
        .expect("token should verify with the gateway secret")
        .claims
    }

    #[test]
    fn test_generate_signs_fixed_claims() {
        let token = GatewayTokenGenerator::new().generate().unwrap();
        let header = decode_header(&token).unwrap();
        assert_eq!(header.alg, Algorithm::HS256);

        let claims = decode_claims(&token);
        assert_eq!(claims.iss, "meualelo.alelo.com.br");
        assert_eq!(claims.sub, "meualelo");
        assert_eq!(claims.fnp, "fe2ae307aceb5898dd89799241a55676");
        assert_eq!(claims.src, "WEB");
    }

    #[test]
    fn test_expiry_is_one_day_ahead() {
        let now = Utc::now();
        let token = GatewayTokenGenerator::new().generate_at(now).unwrap();
        let claims = decode_claims(&token);
        assert_eq!(claims.exp, now.timestamp() + 24 * 60 * 60);
    }

    #[test]
    fn test_deterministic_for_same_instant() {
        let now = Utc::now();
        let generator = GatewayTokenGenerator::new();
        assert_eq!(generator.generate_at(now).unwrap(), generator.generate_at(now).unwrap());
    }

    #[test]
    fn test_rejected_with_other_key() {
        let token = GatewayTokenGenerator::new().generate().unwrap();
        let result = decode::<GatewayClaims>(
            &token,
            &DecodingKey::from_secret(b"not-the-gateway-secret"),
            &Validation::new(Algorithm::HS256),
        );
        assert!(result.is_err());
    }
}
