/// Places the client can be sent to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Route {
    /// Unauthenticated entry point
    Login,
    Register,
    /// Main (protected) view
    Home,
}

impl Route {
    /// `true` for views that require a credential.
    #[must_use]
    pub fn is_protected(&self) -> bool {
        matches!(self, Route::Home)
    }
}

impl std::fmt::Display for Route {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Route::Login => write!(f, "login"),
            Route::Register => write!(f, "register"),
            Route::Home => write!(f, "home"),
        }
    }
}
