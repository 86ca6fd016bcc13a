//! Page capability abstraction.
//!
//! Meet never announces admission over any API; everything the worker
//! learns about a page comes from best-effort UI checks. Those checks
//! are expressed as a small capability trait so the admission detector
//! and the join steps can run against a fake page in tests.

use async_trait::async_trait;
use chromiumoxide::cdp::browser_protocol::input::{DispatchKeyEventParams, DispatchKeyEventType};
use chromiumoxide::Page;

use crate::error::{BrowserError, BrowserResult};

/// Outcome of a single UI probe.
///
/// `Unknown` means the probe itself failed (e.g. a transient DOM
/// inconsistency mid-repaint), which is distinct from a confirmed
/// absence. Callers treat it as "signal absent" but tests can tell
/// the two apart.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Visibility {
    Visible,
    NotVisible,
    Unknown,
}

/// Declarative description of a UI element to probe or act on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectorSpec {
    /// CSS selector; visible means attached, displayed and painted.
    Css(&'static str),
    /// Substring of the page's visible body text.
    BodyText(&'static str),
    /// Button (or role=button) whose visible text contains the needle.
    ButtonText(&'static str),
}

impl SelectorSpec {
    /// JS expression evaluating to a bool: is the element visible now?
    fn probe_js(&self) -> String {
        match self {
            SelectorSpec::Css(sel) => {
                let sel = js_string(sel);
                format!(
                    "(() => {{ const el = document.querySelector({sel}); \
                     if (!el) return false; \
                     const style = window.getComputedStyle(el); \
                     return style.display !== 'none' && style.visibility !== 'hidden' \
                         && el.getClientRects().length > 0; }})()"
                )
            }
            SelectorSpec::BodyText(needle) => {
                let needle = js_string(needle);
                format!(
                    "(() => ((document.body && document.body.innerText) || '')\
                     .includes({needle}))()"
                )
            }
            SelectorSpec::ButtonText(needle) => {
                let needle = js_string(needle);
                format!(
                    "(() => {{ const els = Array.from(document.querySelectorAll('button, [role=\"button\"]')); \
                     return els.some(e => (e.innerText || '').includes({needle})); }})()"
                )
            }
        }
    }

    /// JS expression clicking the element, evaluating to whether a
    /// click happened. Only meaningful for actionable specs.
    fn click_js(&self) -> String {
        match self {
            SelectorSpec::ButtonText(needle) => {
                let needle = js_string(needle);
                format!(
                    "(() => {{ const els = Array.from(document.querySelectorAll('button, [role=\"button\"]')); \
                     const el = els.find(e => (e.innerText || '').includes({needle})); \
                     if (!el) return false; el.click(); return true; }})()"
                )
            }
            // Css clicks go through the CDP element API; body text is
            // not clickable.
            SelectorSpec::Css(_) | SelectorSpec::BodyText(_) => "false".to_string(),
        }
    }
}

/// Encode a Rust string as a JS string literal.
fn js_string(s: &str) -> String {
    serde_json::to_string(s).unwrap_or_else(|_| "\"\"".to_string())
}

/// Keyboard chord dispatched as a trusted input event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyChord {
    pub ctrl: bool,
    pub meta: bool,
    pub key: char,
}

impl KeyChord {
    /// Ctrl+key, the Meet shortcut form on Linux and Windows.
    pub fn ctrl(key: char) -> Self {
        Self {
            ctrl: true,
            meta: false,
            key,
        }
    }

    fn modifiers(&self) -> i64 {
        // CDP modifier bitmask: Alt=1, Ctrl=2, Meta=4, Shift=8.
        let mut mask = 0;
        if self.ctrl {
            mask |= 2;
        }
        if self.meta {
            mask |= 4;
        }
        mask
    }
}

/// What the join flow and the admission detector need from a page.
#[async_trait]
pub trait MeetingPage: Send + Sync {
    /// Best-effort visibility check. Never errors: internal failures
    /// surface as `Unknown`.
    async fn probe(&self, spec: &SelectorSpec) -> Visibility;

    /// Click the element if present. `Ok(false)` when absent.
    async fn click(&self, spec: &SelectorSpec) -> BrowserResult<bool>;

    /// Type text into the element if present. `Ok(false)` when absent.
    async fn type_into(&self, spec: &SelectorSpec, text: &str) -> BrowserResult<bool>;

    /// Dispatch a keyboard chord to the page.
    async fn press_chord(&self, chord: KeyChord) -> BrowserResult<()>;

    /// Close the page. The session stays alive.
    async fn close(&mut self) -> BrowserResult<()>;
}

/// Production page backed by a CDP target.
pub struct CdpPage {
    page: Page,
}

impl CdpPage {
    pub fn new(page: Page) -> Self {
        Self { page }
    }

    /// Access to the underlying CDP page for navigation.
    pub fn raw(&self) -> &Page {
        &self.page
    }
}

#[async_trait]
impl MeetingPage for CdpPage {
    async fn probe(&self, spec: &SelectorSpec) -> Visibility {
        match self.page.evaluate(spec.probe_js()).await {
            Ok(result) => match result.into_value::<bool>() {
                Ok(true) => Visibility::Visible,
                Ok(false) => Visibility::NotVisible,
                Err(_) => Visibility::Unknown,
            },
            Err(_) => Visibility::Unknown,
        }
    }

    async fn click(&self, spec: &SelectorSpec) -> BrowserResult<bool> {
        match spec {
            SelectorSpec::Css(sel) => match self.page.find_element(*sel).await {
                Ok(element) => {
                    element.click().await?;
                    Ok(true)
                }
                // Not found is an expected outcome, not a failure.
                Err(_) => Ok(false),
            },
            SelectorSpec::ButtonText(_) | SelectorSpec::BodyText(_) => {
                let result = self.page.evaluate(spec.click_js()).await?;
                Ok(result.into_value::<bool>().unwrap_or(false))
            }
        }
    }

    async fn type_into(&self, spec: &SelectorSpec, text: &str) -> BrowserResult<bool> {
        let SelectorSpec::Css(sel) = spec else {
            return Ok(false);
        };

        match self.page.find_element(*sel).await {
            Ok(element) => {
                element.click().await?;
                element.type_str(text).await?;
                Ok(true)
            }
            Err(_) => Ok(false),
        }
    }

    async fn press_chord(&self, chord: KeyChord) -> BrowserResult<()> {
        let key = chord.key.to_string();
        let code = format!("Key{}", chord.key.to_ascii_uppercase());

        let down = DispatchKeyEventParams::builder()
            .r#type(DispatchKeyEventType::KeyDown)
            .modifiers(chord.modifiers())
            .key(key.clone())
            .code(code.clone())
            .build()
            .map_err(BrowserError::step)?;
        self.page.execute(down).await?;

        let up = DispatchKeyEventParams::builder()
            .r#type(DispatchKeyEventType::KeyUp)
            .modifiers(chord.modifiers())
            .key(key)
            .code(code)
            .build()
            .map_err(BrowserError::step)?;
        self.page.execute(up).await?;

        Ok(())
    }

    async fn close(&mut self) -> BrowserResult<()> {
        self.page.clone().close().await?;
        Ok(())
    }
}
