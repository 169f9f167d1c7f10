pub mod grant;
pub mod oauth2;
