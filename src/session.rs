use std::ffi::OsStr;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use headless_chrome::protocol::cdp::{Emulation, Page};
use headless_chrome::{Browser, LaunchOptions, Tab};
use rand::Rng;

use crate::config::{Fingerprint, QueryRequest};

/// Injected before any site script runs. Overrides the browser-exposed
/// properties that betray automation: the webdriver flag, empty plugin and
/// language lists, headless hardware concurrency, and the cdc_ globals left
/// behind by ChromeDriver.
const STEALTH_SCRIPT: &str = r#"
    Object.defineProperty(navigator, 'webdriver', { get: () => undefined });
    Object.defineProperty(navigator, 'plugins', {
        get: () => [1, 2, 3, 4, 5],
    });
    Object.defineProperty(navigator, 'languages', {
        get: () => ['en-US', 'en'],
    });
    Object.defineProperty(navigator, 'hardwareConcurrency', { get: () => 4 });

    for (const key of Object.keys(window)) {
        if (key.startsWith('cdc_')) {
            delete window[key];
        }
    }

    window.chrome = { runtime: {}, loadTimes: function() {}, csi: function() {}, app: {} };
"#;

/// One isolated browsing context. Owns the browser process; dropping the
/// session kills Chrome, so teardown happens on every exit path including
/// early returns and panics.
pub struct Session {
    _browser: Browser,
    tab: Arc<Tab>,
    pub fingerprint: Fingerprint,
}

impl Session {
    /// Launch a browser configured for this request. This is the only
    /// stage allowed to fail the run hard.
    pub fn launch(request: &QueryRequest, rng: &mut impl Rng) -> Result<Self> {
        let fingerprint = if request.randomize_fingerprint {
            Fingerprint::randomized(rng)
        } else {
            Fingerprint::pinned()
        };

        tracing::info!(
            user_agent = fingerprint.user_agent,
            viewport = ?fingerprint.viewport,
            timezone = fingerprint.timezone,
            "launching browser session"
        );

        let ua_arg = format!("--user-agent={}", fingerprint.user_agent);
        let lang_arg = format!("--lang={}", request.locale);

        let mut args = vec![
            OsStr::new("--disable-blink-features=AutomationControlled"),
            OsStr::new("--no-sandbox"),
            OsStr::new("--disable-dev-shm-usage"),
            OsStr::new("--disable-infobars"),
            OsStr::new("--window-position=0,0"),
        ];
        args.push(OsStr::new(&ua_arg));
        args.push(OsStr::new(&lang_arg));

        let browser = Browser::new(LaunchOptions {
            headless: request.headless,
            window_size: Some(fingerprint.viewport),
            args,
            ..Default::default()
        })?;

        let tab = browser.new_tab()?;
        tab.set_default_timeout(Duration::from_millis(request.timeout_ms));

        tab.enable_debugger()?;
        tab.call_method(Page::AddScriptToEvaluateOnNewDocument {
            source: STEALTH_SCRIPT.to_string(),
            world_name: None,
            include_command_line_api: None,
            run_immediately: None,
        })?;
        tab.call_method(Emulation::SetTimezoneOverride {
            timezone_id: fingerprint.timezone.to_string(),
        })?;

        Ok(Self {
            _browser: browser,
            tab,
            fingerprint,
        })
    }

    pub fn tab(&self) -> &Tab {
        &self.tab
    }

    pub fn user_agent(&self) -> &str {
        self.fingerprint.user_agent
    }

    /// Full-page PNG screenshot written to `path`.
    pub fn screenshot_png(&self, path: &Path) -> Result<()> {
        let png = self.tab.capture_screenshot(
            Page::CaptureScreenshotFormatOption::Png,
            None,
            None,
            true,
        )?;
        std::fs::write(path, png)?;
        Ok(())
    }
}
