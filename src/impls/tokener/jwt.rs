use crate::core::tokener::{Payload, Tokener};
use crate::error::Error;
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};

pub struct JWT {
    secret: Vec<u8>,
}

impl JWT {
    pub fn new(secret: Vec<u8>) -> Self {
        Self { secret }
    }
}

impl<P> Tokener<P> for JWT
where
    P: Payload,
{
    fn gen_token(&self, payload: &P) -> Result<String, Error> {
        let header = Header::new(Algorithm::HS256);
        let key = EncodingKey::from_secret(&self.secret);
        let token = encode(&header, payload, &key)?;
        Ok(token)
    }
    fn verify_token(&self, token: &str) -> Result<P, Error> {
        let key = DecodingKey::from_secret(&self.secret);
        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = 0;
        let payload = decode(token, &key, &validation)?;
        Ok(payload.claims)
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::core::tokener::Claim;

    #[test]
    fn test_gen_and_verify_token() {
        let jwt = JWT::new(vec![1, 2, 3, 4, 5, 6, 7, 8, 9, 0]);
        let claim = Claim::new(42, 3600);
        let token = jwt.gen_token(&claim).unwrap();
        let c: Claim = jwt.verify_token(&token).unwrap();
        assert_eq!(c.user_id(), Some(42));
    }

    #[test]
    fn test_different_tokens() {
        let jwt = JWT::new(vec![1, 2, 3, 4, 5, 6, 7, 8, 9, 0]);
        let token_a = jwt.gen_token(&Claim::new(1, 3600)).unwrap();
        let token_b = jwt.gen_token(&Claim::new(2, 3600)).unwrap();
        assert_ne!(token_a, token_b);
        let c_a: Claim = jwt.verify_token(&token_a).unwrap();
        let c_b: Claim = jwt.verify_token(&token_b).unwrap();
        assert_eq!(c_a.user, "1");
        assert_eq!(c_b.user, "2");
    }

    #[test]
    fn test_expired_token() {
        let jwt = JWT::new(b"secret".to_vec());
        let token = jwt.gen_token(&Claim::new(1, -60)).unwrap();
        let res: Result<Claim, Error> = jwt.verify_token(&token);
        assert!(matches!(res, Err(Error::Jwt(_))));
    }

    #[test]
    fn test_wrong_secret() {
        let token = JWT::new(b"secret".to_vec()).gen_token(&Claim::new(1, 3600)).unwrap();
        let res: Result<Claim, Error> = JWT::new(b"other".to_vec()).verify_token(&token);
        assert!(res.is_err());
    }
}
