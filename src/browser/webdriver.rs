//! W3C WebDriver Session
//!
//! Speaks the WebDriver wire protocol (JSON over HTTP) to a running driver
//! such as chromedriver. Installing and launching the driver binary is left
//! to the operator; point `webdriver_url` at it.

use async_trait::async_trait;
use reqwest::{Client, Method};
use serde_json::{json, Value};
use tracing::{debug, info, warn};

use super::{BrowserSession, ElementRef, Locator, Lookup, Miss, SessionProvider};
use crate::config::BrowserConfig;
use crate::error::{MetamorphError, Result};

/// Key under which W3C drivers return element references.
const ELEMENT_KEY: &str = "element-6066-11e4-a52f-4a4e2a3e5a02";

/// A live WebDriver session.
#[derive(Debug)]
pub struct WebDriverSession {
    client: Client,
    base_url: String,
    session_id: String,
}

impl WebDriverSession {
    /// Create a new browser session on the driver at `config.webdriver_url`.
    pub async fn start(config: &BrowserConfig) -> Result<Self> {
        let client = Client::builder().timeout(config.command_timeout()).build()?;
        let base_url = config.webdriver_url.trim_end_matches('/').to_string();

        let body = json!({ "capabilities": { "alwaysMatch": capabilities(config) } });
        let response = client
            .post(format!("{}/session", base_url))
            .json(&body)
            .send()
            .await?;
        let value = unwrap_response("POST /session", response).await?;

        let session_id = value["sessionId"]
            .as_str()
            .ok_or_else(|| MetamorphError::WebDriver {
                command: "POST /session".to_string(),
                error: "invalid response".to_string(),
                message: "missing sessionId".to_string(),
            })?
            .to_string();

        info!("WebDriver session {} started at {}", session_id, base_url);
        Ok(Self {
            client,
            base_url,
            session_id,
        })
    }

    async fn command(&self, method: Method, path: &str, body: Option<Value>) -> Result<Value> {
        let url = format!("{}/session/{}{}", self.base_url, self.session_id, path);
        let label = format!("{} {}", method, if path.is_empty() { "/" } else { path });
        debug!("WebDriver {}", label);

        let mut request = self.client.request(method, &url);
        if let Some(body) = body {
            request = request.json(&body);
        }
        let response = request.send().await?;
        unwrap_response(&label, response).await
    }

    fn element_path(element: &ElementRef, suffix: &str) -> String {
        format!("/element/{}{}", element.id(), suffix)
    }
}

/// Chrome capabilities mirroring the flags the tool has always launched with.
fn capabilities(config: &BrowserConfig) -> Value {
    let mut args = vec![
        format!("--window-size={},{}", config.window_width, config.window_height),
        "--disable-gpu".to_string(),
        "--no-sandbox".to_string(),
        format!("--lang={}", config.language),
    ];
    if config.headless {
        args.insert(0, "--headless=new".to_string());
    }

    json!({
        "browserName": "chrome",
        "goog:chromeOptions": { "args": args },
        "timeouts": { "pageLoad": config.page_load_timeout_ms },
    })
}

/// Strip the `{"value": ...}` envelope, mapping error payloads to [`MetamorphError::WebDriver`].
async fn unwrap_response(command: &str, response: reqwest::Response) -> Result<Value> {
    let status = response.status();
    let mut body: Value = response.json().await?;
    let value = body["value"].take();

    if status.is_success() {
        return Ok(value);
    }

    Err(MetamorphError::WebDriver {
        command: command.to_string(),
        error: value["error"].as_str().unwrap_or("unknown error").to_string(),
        message: value["message"]
            .as_str()
            .unwrap_or_else(|| status.canonical_reason().unwrap_or(""))
            .to_string(),
    })
}

/// Map the W3C error codes that mean "nothing usable this attempt".
fn lookup_miss(err: &MetamorphError) -> Option<Miss> {
    match err {
        MetamorphError::WebDriver { error, .. } => match error.as_str() {
            "no such element" => Some(Miss::Absent),
            "stale element reference" => Some(Miss::Stale),
            "invalid selector" => Some(Miss::InvalidSelector),
            _ => None,
        },
        _ => None,
    }
}

fn as_string(value: Value) -> String {
    match value {
        Value::String(s) => s,
        Value::Null => String::new(),
        other => other.to_string(),
    }
}

#[async_trait]
impl BrowserSession for WebDriverSession {
    async fn navigate(&self, url: &str) -> Result<()> {
        self.command(Method::POST, "/url", Some(json!({ "url": url })))
            .await
            .map(|_| ())
    }

    async fn find_element(&self, locator: &Locator) -> Result<Lookup> {
        let body = json!({ "using": locator.strategy.w3c_name(), "value": locator.selector });
        match self.command(Method::POST, "/element", Some(body)).await {
            Ok(value) => match value[ELEMENT_KEY].as_str() {
                Some(id) => Ok(Lookup::Found(ElementRef(id.to_string()))),
                None => Ok(Lookup::NotFound(Miss::Absent)),
            },
            Err(e) => match lookup_miss(&e) {
                Some(miss) => Ok(Lookup::NotFound(miss)),
                None => Err(e),
            },
        }
    }

    async fn is_displayed(&self, element: &ElementRef) -> Result<bool> {
        match self
            .command(Method::GET, &Self::element_path(element, "/displayed"), None)
            .await
        {
            Ok(value) => Ok(value.as_bool().unwrap_or(false)),
            Err(e) if lookup_miss(&e).is_some() => Ok(false),
            Err(e) => Err(e),
        }
    }

    async fn tag_name(&self, element: &ElementRef) -> Result<String> {
        self.command(Method::GET, &Self::element_path(element, "/name"), None)
            .await
            .map(as_string)
    }

    async fn text(&self, element: &ElementRef) -> Result<String> {
        self.command(Method::GET, &Self::element_path(element, "/text"), None)
            .await
            .map(as_string)
    }

    async fn clear(&self, element: &ElementRef) -> Result<()> {
        self.command(Method::POST, &Self::element_path(element, "/clear"), Some(json!({})))
            .await
            .map(|_| ())
    }

    async fn click(&self, element: &ElementRef) -> Result<()> {
        self.command(Method::POST, &Self::element_path(element, "/click"), Some(json!({})))
            .await
            .map(|_| ())
    }

    async fn send_keys(&self, element: &ElementRef, text: &str) -> Result<()> {
        self.command(
            Method::POST,
            &Self::element_path(element, "/value"),
            Some(json!({ "text": text })),
        )
        .await
        .map(|_| ())
    }

    async fn current_url(&self) -> Result<String> {
        self.command(Method::GET, "/url", None).await.map(as_string)
    }

    async fn page_source(&self) -> Result<String> {
        self.command(Method::GET, "/source", None).await.map(as_string)
    }

    async fn quit(&self) -> Result<()> {
        info!("Closing WebDriver session {}", self.session_id);
        self.command(Method::DELETE, "", None).await.map(|_| ())
    }
}

/// Opens Chrome sessions against a configured driver endpoint.
pub struct WebDriverProvider {
    config: BrowserConfig,
}

impl WebDriverProvider {
    pub fn new(config: BrowserConfig) -> Self {
        Self { config }
    }
}

#[async_trait]
impl SessionProvider for WebDriverProvider {
    type Session = WebDriverSession;

    async fn open(&self) -> Result<WebDriverSession> {
        WebDriverSession::start(&self.config).await.map_err(|e| {
            warn!("Could not start a browser session: {}", e);
            e
        })
    }
}
