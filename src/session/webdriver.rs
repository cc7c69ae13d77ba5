use crate::config::ScraperConfig;
use crate::session::{Node, Session, SessionError};
use fantoccini::elements::Element;
use fantoccini::error::CmdError;
use fantoccini::wd::Capabilities;
use fantoccini::{Client, ClientBuilder, Locator};
use serde_json::json;
use std::time::Duration;

/// Endpoints tried when the configured WebDriver URL refuses the connection
const FALLBACK_WEBDRIVER_URLS: [&str; 2] = [
    "http://localhost:9515", // ChromeDriver default
    "http://127.0.0.1:4444",
];

/// Chrome flags that keep GPU/WebGL errors out of headless and VM runs
const CHROME_ARGS: [&str; 7] = [
    "--no-sandbox",
    "--disable-dev-shm-usage",
    "--disable-gpu",
    "--disable-webgl",
    "--disable-webgl2",
    "--disable-3d-apis",
    "--disable-features=VizDisplayCompositor",
];

/// A browser session driven over WebDriver
pub struct WebDriverSession {
    client: Client,
}

/// Element handle backed by a WebDriver element reference
#[derive(Clone, Debug)]
pub struct WebElement(Element);

impl WebDriverSession {
    /// Connects to the configured WebDriver server, trying local fallbacks if it is unreachable
    pub async fn connect(config: &ScraperConfig) -> Result<Self, SessionError> {
        let capabilities = chrome_capabilities(config);

        let first_error = match connect_to(&config.webdriver_url, &capabilities).await {
            Ok(client) => return Ok(Self { client }),
            Err(e) => {
                ::log::error!(
                    "Failed to connect to WebDriver at {}: {}",
                    config.webdriver_url,
                    e
                );
                e
            }
        };

        for url in FALLBACK_WEBDRIVER_URLS {
            if url == config.webdriver_url {
                continue;
            }
            ::log::info!("Trying fallback WebDriver URL: {}", url);
            if let Ok(client) = connect_to(url, &capabilities).await {
                return Ok(Self { client });
            }
        }

        ::log::error!(
            "Make sure a WebDriver server is running or set the WEBDRIVER_URL environment variable"
        );
        Err(first_error.into())
    }
}

async fn connect_to(
    url: &str,
    capabilities: &Capabilities,
) -> Result<Client, fantoccini::error::NewSessionError> {
    let mut builder = ClientBuilder::native();
    builder.capabilities(capabilities.clone());
    let client = builder.connect(url).await?;
    ::log::debug!("Connected to WebDriver at {}", url);
    Ok(client)
}

fn chrome_capabilities(config: &ScraperConfig) -> Capabilities {
    let mut args: Vec<String> = CHROME_ARGS.iter().map(|a| a.to_string()).collect();
    args.push(format!("--window-size={}", config.window_size));
    if config.headless {
        args.push("--headless=new".to_string());
    }

    let mut capabilities = Capabilities::new();
    capabilities.insert(
        "goog:chromeOptions".to_string(),
        json!({
            "args": args,
            "excludeSwitches": ["enable-logging"],
        }),
    );
    capabilities
}

impl Session for WebDriverSession {
    type Element = WebElement;

    async fn goto(&mut self, url: &str) -> Result<(), SessionError> {
        self.client.goto(url).await?;
        Ok(())
    }

    async fn title(&self) -> Result<String, SessionError> {
        Ok(self.client.title().await?)
    }

    async fn find_all(&self, css: &str) -> Result<Vec<WebElement>, SessionError> {
        let found = self.client.find_all(Locator::Css(css)).await?;
        Ok(found.into_iter().map(WebElement).collect())
    }

    async fn wait_for(&self, css: &str, timeout: Duration) -> Result<bool, SessionError> {
        match self
            .client
            .wait()
            .at_most(timeout)
            .for_element(Locator::Css(css))
            .await
        {
            Ok(_) => Ok(true),
            Err(CmdError::WaitTimeout) => Ok(false),
            Err(e) => Err(e.into()),
        }
    }

    async fn script_click(&self, element: &WebElement) -> Result<(), SessionError> {
        let arg = serde_json::to_value(&element.0)?;
        self.client
            .execute("arguments[0].click();", vec![arg])
            .await?;
        Ok(())
    }

    /// Ends the WebDriver session and closes the browser window
    async fn close(self) -> Result<(), SessionError> {
        self.client.close().await?;
        Ok(())
    }
}

impl Node for WebElement {
    async fn attr(&self, name: &str) -> Result<Option<String>, SessionError> {
        Ok(self.0.attr(name).await?)
    }

    async fn prop(&self, name: &str) -> Result<Option<String>, SessionError> {
        Ok(self.0.prop(name).await?)
    }

    async fn text(&self) -> Result<String, SessionError> {
        Ok(self.0.text().await?)
    }

    async fn is_displayed(&self) -> Result<bool, SessionError> {
        Ok(self.0.is_displayed().await?)
    }

    async fn find_all(&self, css: &str) -> Result<Vec<WebElement>, SessionError> {
        let found = self.0.find_all(Locator::Css(css)).await?;
        Ok(found.into_iter().map(WebElement).collect())
    }
}
