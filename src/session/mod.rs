pub mod webdriver;

#[cfg(test)]
pub(crate) mod fixture;

use std::future::Future;
use std::time::Duration;
use thiserror::Error;

pub use webdriver::WebDriverSession;

/// Errors raised by the browser session
#[derive(Debug, Error)]
pub enum SessionError {
    /// A WebDriver command failed
    #[error("webdriver command failed: {0}")]
    Command(#[from] fantoccini::error::CmdError),

    /// No WebDriver session could be created
    #[error("failed to start webdriver session: {0}")]
    Connect(#[from] fantoccini::error::NewSessionError),

    /// An element could not be passed to an injected script
    #[error("failed to encode script argument: {0}")]
    Encode(#[from] serde_json::Error),

    /// The page refused a lookup or read (bad selector, detached element)
    #[error("browser rejected the command: {0}")]
    Rejected(String),
}

/// A handle to one element of the rendered page
pub trait Node: Clone + Send + Sync {
    /// Raw attribute value as written in the markup
    fn attr(&self, name: &str) -> impl Future<Output = Result<Option<String>, SessionError>> + Send;

    /// DOM property value (`href` and `src` come back absolute)
    fn prop(&self, name: &str) -> impl Future<Output = Result<Option<String>, SessionError>> + Send;

    /// Rendered text of the element
    fn text(&self) -> impl Future<Output = Result<String, SessionError>> + Send;

    fn is_displayed(&self) -> impl Future<Output = Result<bool, SessionError>> + Send;

    /// Search for descendants of this element
    fn find_all(&self, css: &str) -> impl Future<Output = Result<Vec<Self>, SessionError>> + Send;
}

/// The live page a run drives.
///
/// A session is owned by exactly one run; nothing here is synchronised, so
/// concurrent runs must each hold their own session.
pub trait Session: Send + Sync {
    type Element: Node;

    /// Navigate to `url` and block until the browser reports the load
    fn goto(&mut self, url: &str) -> impl Future<Output = Result<(), SessionError>> + Send;

    /// The document title
    fn title(&self) -> impl Future<Output = Result<String, SessionError>> + Send;

    /// All elements matching `css`, in document order
    fn find_all(
        &self,
        css: &str,
    ) -> impl Future<Output = Result<Vec<Self::Element>, SessionError>> + Send;

    /// Wait until at least one element matches `css`.
    ///
    /// Returns `Ok(false)` when `timeout` elapses first.
    fn wait_for(
        &self,
        css: &str,
        timeout: Duration,
    ) -> impl Future<Output = Result<bool, SessionError>> + Send;

    /// Activate an element from script rather than through a native click,
    /// so overlays and off-screen positioning do not intercept it
    fn script_click(
        &self,
        element: &Self::Element,
    ) -> impl Future<Output = Result<(), SessionError>> + Send;

    /// End the session and release the browser
    fn close(self) -> impl Future<Output = Result<(), SessionError>> + Send;
}

/// Reads a URL-valued field, preferring the resolved property over the raw attribute
pub async fn url_of<N: Node>(node: &N, name: &str) -> Result<Option<String>, SessionError> {
    let value = match node.prop(name).await? {
        Some(v) if !v.trim().is_empty() => Some(v),
        _ => node.attr(name).await?,
    };
    Ok(value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty()))
}
