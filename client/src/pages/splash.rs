use crate::router::{Navigator, Route};

/// Entry screen. Once the shell is ready the user continues to login;
/// the splash route is replaced so it never appears in back-navigation.
#[derive(Debug, Default)]
pub struct SplashViewModel {
    ready: bool,
}

impl SplashViewModel {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn prepare(&mut self) {
        self.ready = true;
    }

    pub fn is_ready(&self) -> bool {
        self.ready
    }

    pub fn continue_to_login(&self, nav: &mut Navigator) {
        nav.replace(Route::Login);
    }
}
