//! Opening links in the user's default browser.

use crate::error::{Error, Result};

/// Something that can show a web page to the user.
pub trait Browser {
    /// Open `url`.
    fn open(&mut self, url: &str) -> Result<()>;
}

/// Opens URLs with the system's default handler.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemBrowser;

impl Browser for SystemBrowser {
    fn open(&mut self, url: &str) -> Result<()> {
        open::that(url).map_err(|source| Error::BrowserError {
            url: url.to_string(),
            source,
        })
    }
}
