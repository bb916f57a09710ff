use super::handlers::{health, login};
use crate::{
    flow::{AuthKind, AuthMode, Degradation},
    render::{CredentialsForm, LoginView, ProviderSignIn},
};
use utoipa::OpenApi;

#[derive(OpenApi)]
#[openapi(
    paths(login::login, health::health),
    components(schemas(
        login::LoginPage,
        login::PageAction,
        health::Health,
        AuthKind,
        AuthMode,
        Degradation,
        LoginView,
        ProviderSignIn,
        CredentialsForm,
    )),
    tags(
        (name = "auth", description = "Login landing flow"),
        (name = "health", description = "Service and backend health"),
    )
)]
struct ApiDoc;

#[must_use]
pub fn openapi() -> utoipa::openapi::OpenApi {
    ApiDoc::openapi()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn openapi_documents_routes() {
        let doc = openapi();
        assert!(doc.paths.paths.contains_key("/auth/login"));
        assert!(doc.paths.paths.contains_key("/health"));
        assert_eq!(doc.info.title, env!("CARGO_PKG_NAME"));
    }
}
