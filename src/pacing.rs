use std::time::Duration;

use headless_chrome::Tab;
use rand::Rng;
use tokio::time::sleep;

/// Mouse movement towards the middle of the viewport, linear interpolation
/// with jitter. Dispatched as DOM events from page context.
const MOUSE_MOVE_JS: &str = r#"
    async function humanMouseMove(startX, startY, endX, endY, steps) {
        for (let i = 0; i <= steps; i++) {
            const t = i / steps;
            const x = startX + (endX - startX) * t + (Math.random() - 0.5) * 5;
            const y = startY + (endY - startY) * t + (Math.random() - 0.5) * 5;
            document.dispatchEvent(new MouseEvent('mousemove', {
                view: window, bubbles: true, cancelable: true, clientX: x, clientY: y
            }));
            await new Promise(r => setTimeout(r, 10 + Math.random() * 20));
        }
    }
    humanMouseMove(100, 100, window.innerWidth / 2, window.innerHeight / 2, 25);
"#;

/// Bounded downward scroll with a small correction back up.
const SCROLL_JS: &str = r#"
    (function() {
        let scrolled = 0;
        const interval = setInterval(() => {
            window.scrollBy(0, 50 + Math.random() * 50);
            scrolled += 100;
            if (scrolled > 600) {
                clearInterval(interval);
                window.scrollBy(0, -200);
            }
        }, 100 + Math.random() * 100);
    })();
"#;

/// Uniform sample from [min_ms, max_ms]. Both endpoints zero disables the
/// delay entirely; an inverted range collapses to the lower bound.
pub fn sample_delay(min_ms: u64, max_ms: u64, rng: &mut impl Rng) -> Option<Duration> {
    if min_ms == 0 && max_ms == 0 {
        return None;
    }
    let ms = if max_ms <= min_ms {
        min_ms
    } else {
        rng.gen_range(min_ms..=max_ms)
    };
    Some(Duration::from_millis(ms))
}

/// Blocks the run before navigation for a randomized interval.
pub async fn pre_request_delay(min_ms: u64, max_ms: u64, rng: &mut impl Rng) {
    if let Some(delay) = sample_delay(min_ms, max_ms, rng) {
        tracing::debug!(delay_ms = delay.as_millis() as u64, "pre-request delay");
        sleep(delay).await;
    }
}

/// Per-character pause used when typing into the search box.
pub fn typing_delay(rng: &mut impl Rng) -> Duration {
    Duration::from_millis(rng.gen_range(80..=200))
}

/// Fixed settle wait, e.g. for async AI content to finish rendering.
pub async fn settle(ms: u64) {
    sleep(Duration::from_millis(ms)).await;
}

/// Post-load behavioral realism: pointer motion and a light scroll with a
/// randomized pause in between. Purely cosmetic; failures are ignored.
pub async fn simulate_reading(tab: &Tab, rng: &mut impl Rng) {
    if let Err(e) = tab.evaluate(MOUSE_MOVE_JS, false) {
        tracing::debug!(?e, "mouse move simulation failed");
    }
    sleep(Duration::from_millis(rng.gen_range(400..=900))).await;
    if let Err(e) = tab.evaluate(SCROLL_JS, false) {
        tracing::debug!(?e, "scroll simulation failed");
    }
    sleep(Duration::from_millis(rng.gen_range(300..=700))).await;
}
