//! Data loaders for the storefront views.
//!
//! Each loader does what a view does when it is opened: check the session,
//! fetch what it needs once, and fall back quietly when the backend fails.
//! Rendering is left to the caller.

pub mod products;
pub mod profile;

pub use products::{ProductsView, load_product_detail, load_products};
pub use profile::{ProfileView, load_profile};

/// Outcome of loading a gated view.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Page<T> {
    /// No token stored; nothing was fetched.
    LoginRequired,
    /// The backend did not return the requested record.
    NotFound,
    Ready(T),
}

impl<T> Page<T> {
    /// The loaded data, if any.
    #[must_use]
    pub fn ready(self) -> Option<T> {
        match self {
            Self::Ready(value) => Some(value),
            Self::LoginRequired | Self::NotFound => None,
        }
    }

    #[must_use]
    pub const fn is_login_required(&self) -> bool {
        matches!(self, Self::LoginRequired)
    }
}
