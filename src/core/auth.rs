use crate::config::Config;
use crate::impls::tokener::jwt::JWT;
use serde::Serialize;

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
#[serde(tag = "id", rename_all = "lowercase")]
pub enum Provider {
    Credentials,
    Google {
        #[serde(skip_serializing)]
        client_id: String,
    },
}

/// Everything sign-in and session checks need, built once at startup.
#[derive(Debug, Clone)]
pub struct AuthConfig {
    pub secret: Vec<u8>,
    pub session_max_age: i64,
    pub providers: Vec<Provider>,
}

impl AuthConfig {
    pub fn new(secret: Vec<u8>, session_max_age: i64, providers: Vec<Provider>) -> Self {
        Self {
            secret,
            session_max_age,
            providers,
        }
    }

    pub fn from_config(config: &Config) -> Self {
        let mut providers = Vec::new();
        if let Some(client_id) = &config.google_client_id {
            providers.push(Provider::Google { client_id: client_id.clone() });
        }
        providers.push(Provider::Credentials);
        Self::new(config.jwt_secret.as_bytes().to_owned(), config.session_max_age, providers)
    }

    pub fn tokener(&self) -> JWT {
        JWT::new(self.secret.clone())
    }

    pub fn allows_credentials(&self) -> bool {
        self.providers.contains(&Provider::Credentials)
    }
}

#[cfg(test)]
mod test {
    use super::*;

    fn config(google: Option<&str>) -> Config {
        Config {
            database_url: "postgres://localhost/academy".into(),
            max_connections: 5,
            bind_addr: "0.0.0.0:8000".into(),
            jwt_secret: "secret".into(),
            session_max_age: 3600,
            casbin_model: "src/privilege/casbin.conf".into(),
            casbin_policy: "src/privilege/policies.csv".into(),
            google_client_id: google.map(Into::into),
        }
    }

    #[test]
    fn test_providers() {
        let auth = AuthConfig::from_config(&config(Some("client")));
        assert_eq!(auth.providers.len(), 2);
        assert!(auth.allows_credentials());
        let auth = AuthConfig::from_config(&config(None));
        assert_eq!(auth.providers, vec![Provider::Credentials]);
        assert_eq!(auth.session_max_age, 3600);
    }

    #[test]
    fn test_provider_json_hides_client_id() {
        let json = serde_json::to_value(Provider::Google { client_id: "client".into() }).unwrap();
        assert_eq!(json, serde_json::json!({ "id": "google" }));
    }
}
