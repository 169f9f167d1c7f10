use crate::config::sources::OAuthConfig;

/// OAuth2 grants sent to the Drupal token endpoint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Grant {
    /// resource owner password credentials
    Password,
    /// exchange of a previously issued refresh token
    RefreshToken(String),
}

impl Grant {
    pub fn grant_type(&self) -> &'static str {
        match self {
            Grant::Password => "password",
            Grant::RefreshToken(_) => "refresh_token",
        }
    }

    /// Form fields, in the order they are sent.
    ///
    /// The refresh grant carries the resource owner credentials as well as
    /// the refresh token; the Drupal backend has always received both.
    pub fn form<'a>(&'a self, oauth: &'a OAuthConfig) -> Vec<(&'static str, &'a str)> {
        let mut form = vec![
            ("client_id", oauth.client_id.as_str()),
            ("client_secret", oauth.client_secret.as_str()),
            ("grant_type", self.grant_type()),
            ("scope", oauth.scope.as_str()),
        ];
        if let Grant::RefreshToken(refresh_token) = self {
            form.push(("refresh_token", refresh_token.as_str()));
        }
        form.push(("username", oauth.username.as_str()));
        form.push(("password", oauth.password.as_str()));
        form
    }
}
