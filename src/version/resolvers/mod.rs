//! Latest version resolvers

mod release_redirect;

pub use release_redirect::ReleaseRedirectResolver;
