use wozway_core::Params;
use wozway_core::prelude::SecretString;

/// Credentials sent with every call.
#[derive(Clone, Debug, Default, PartialEq, Params)]
pub struct Security {
    #[wozway(security(scheme, type = "http", sub_type = "bearer", field_name = "Authorization"))]
    pub bearer_auth: Option<SecretString>,
}

impl Security {
    pub fn bearer(token: impl Into<SecretString>) -> Self {
        Self {
            bearer_auth: Some(token.into()),
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use wozway_core::security::get_security;

    #[test]
    fn bearer_token_lands_in_authorization() {
        let sec = get_security(&Security::bearer("abc")).unwrap();
        assert_eq!(sec.headers["authorization"], "Bearer abc");
        assert!(sec.query.is_empty());
    }

    #[test]
    fn unset_token_sends_nothing() {
        let sec = get_security(&Security::default()).unwrap();
        assert!(sec.headers.is_empty());
    }
}
