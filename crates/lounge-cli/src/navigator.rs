//! Terminal navigator: resolves page routes against the site URL and either
//! prints them or opens them in the default browser.

use async_trait::async_trait;
use lounge_core::{LoungeError, Navigator};
use tracing::info;
use url::Url;

pub struct BrowserNavigator {
    site: Url,
    open_browser: bool,
}

impl BrowserNavigator {
    pub fn new(site: Url, open_browser: bool) -> Self {
        Self { site, open_browser }
    }

    pub fn resolve(&self, target: &str) -> Result<Url, LoungeError> {
        self.site
            .join(target)
            .map_err(|e| LoungeError::Navigation(format!("{}: {}", target, e)))
    }
}

#[async_trait]
impl Navigator for BrowserNavigator {
    async fn navigate(&self, target: &str) -> Result<(), LoungeError> {
        let url = self.resolve(target)?;

        if self.open_browser {
            info!("Opening {}", url);
            open::that(url.as_str()).map_err(|e| LoungeError::Navigation(e.to_string()))?;
        } else {
            println!("Open to enter the lounge: {}", url);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_lounge_target() {
        let nav = BrowserNavigator::new(Url::parse("https://lounge.example/").unwrap(), false);
        let url = nav.resolve("/lounge?signature=0xabc").unwrap();
        assert_eq!(url.as_str(), "https://lounge.example/lounge?signature=0xabc");
    }

    #[tokio::test]
    async fn test_navigate_prints_without_browser() {
        let nav = BrowserNavigator::new(Url::parse("http://localhost:3000").unwrap(), false);
        assert!(nav.navigate("/lounge?signature=0x1").await.is_ok());
    }
}
