//! Browser backends.

pub mod http;

#[cfg(feature = "chrome")]
pub mod chrome;

pub use http::HttpBrowser;

#[cfg(feature = "chrome")]
pub use chrome::ChromeBrowser;
