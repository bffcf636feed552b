//! In-page scripts. Each returns plain JSON so the Rust side can decode it with serde.
//!
//! Selectors target the review markup of the menu page: styled-component class names
//! such as `Comments__CommentsList-xyz` survive builds only as substrings, hence the
//! `[class*=...]` matching everywhere.

/// Counts review items at document scope and inside dialog scopes.
pub const REVIEW_ITEM_PROBE: &str = r#"
(() => {
    const ITEM = '[class*="Item__Container"]';
    const dialogs = Array.from(document.querySelectorAll('[role="dialog"], [aria-modal="true"], [class*="Modal"]'));
    return {
        document: document.querySelectorAll(ITEM).length,
        dialog: dialogs.reduce((n, d) => n + d.querySelectorAll(ITEM).length, 0),
        dialog_open: dialogs.length > 0
    };
})()
"#;

/// Structured snapshot of every review item for positional parsing.
pub const STRICT_SNAPSHOT: &str = r#"
(() => {
    const text = el => (el && (el.innerText || el.textContent)) || '';
    const list = document.querySelector('[class*="Comments__CommentsList"]');
    const scope = list || document;
    return Array.from(scope.querySelectorAll('[class*="Item__Container"]')).map(el => {
        const info = el.querySelector('[class*="Item__CommentInfo"]');
        const body = el.querySelector('[class*="Item__CommentContent"]');
        const rate = info ? info.querySelector('[class*="Item__Rate"]') : null;
        return {
            info: info ? {
                paragraphs: Array.from(info.querySelectorAll('p')).map(text),
                rate: rate ? rate.textContent : null
            } : null,
            body: body ? {
                paragraphs: Array.from(body.querySelectorAll('p')).map(text),
                tags: Array.from(body.querySelectorAll('[class*="Item__CommentTags"] p')).map(text)
            } : null
        };
    });
})()
"#;

/// Every text block within a length window, in document order. `parent` is the index of
/// the nearest enclosing block that also fits, so nesting can be resolved after filtering.
pub fn heuristic_snapshot(min_chars: usize, max_chars: usize) -> String {
    format!(
        r#"
(() => {{
    const MIN = {min_chars}, MAX = {max_chars};
    const text = el => (el.innerText || el.textContent || '').trim();
    const fits = el => {{ const n = text(el).length; return n >= MIN && n <= MAX; }};
    const nodes = Array.from(document.querySelectorAll('article, section, li, div, p')).filter(fits);
    const index = new Map(nodes.map((el, i) => [el, i]));
    return nodes.map(el => {{
        let up = el.parentElement, parent = null;
        while (up) {{
            if (index.has(up)) {{ parent = index.get(up); break; }}
            up = up.parentElement;
        }}
        const hintEl = el.querySelector('[class*="name" i], [class*="author" i], [class*="user" i]');
        return {{ text: text(el), name_hint: hintEl ? text(hintEl) : null, parent }};
    }});
}})()
"#
    )
}

/// Finds the innermost actionable element containing one of `phrases`, scrolls it into
/// view and clicks it natively. Returns the element's centre for a follow-up pointer click.
pub fn click_by_text(phrases: &[&str]) -> String {
    let phrases = serde_json::to_string(phrases).unwrap_or_else(|_| "[]".to_string());
    format!(
        r#"
(() => {{
    const PHRASES = {phrases};
    const candidates = Array.from(document.querySelectorAll('button, a, [role="button"], div, span'))
        .filter(el => {{
            const t = (el.innerText || '').trim();
            return t && PHRASES.some(p => t.includes(p));
        }});
    if (!candidates.length) return null;
    const el = candidates.find(c => !candidates.some(o => o !== c && c.contains(o))) || candidates[0];
    el.scrollIntoView({{ block: 'center', inline: 'center' }});
    try {{ el.click(); }} catch (e) {{}}
    const r = el.getBoundingClientRect();
    return {{ x: r.left + r.width / 2, y: r.top + r.height / 2 }};
}})()
"#
    )
}

/// Same click pair as [`click_by_text`], located through attribute selectors instead.
pub fn click_by_selector(selectors: &[&str]) -> String {
    let selectors = serde_json::to_string(selectors).unwrap_or_else(|_| "[]".to_string());
    format!(
        r#"
(() => {{
    const SELECTORS = {selectors};
    let el = null;
    for (const s of SELECTORS) {{
        try {{ el = document.querySelector(s); }} catch (e) {{ el = null; }}
        if (el) break;
    }}
    if (!el) return null;
    el.scrollIntoView({{ block: 'center', inline: 'center' }});
    try {{ el.click(); }} catch (e) {{}}
    const r = el.getBoundingClientRect();
    return {{ x: r.left + r.width / 2, y: r.top + r.height / 2 }};
}})()
"#
    )
}

pub const VIEWPORT_SIZE: &str = r#"({ width: window.innerWidth, height: window.innerHeight })"#;

/// Clicks every actionable element whose label matches the dismissal vocabulary.
/// With `spare_dialogs`, controls inside an open dialog are left alone.
pub fn dismiss_overlays(labels: &[&str], spare_dialogs: bool) -> String {
    let labels = serde_json::to_string(labels).unwrap_or_else(|_| "[]".to_string());
    format!(
        r#"
(() => {{
    const LABELS = {labels}.map(l => l.toLowerCase());
    const SPARE_DIALOGS = {spare_dialogs};
    const DIALOG = '[role="dialog"], [aria-modal="true"], [class*="Modal"]';
    const label = el => ((el.innerText || '') + ' ' + (el.getAttribute('aria-label') || '')).trim().toLowerCase();
    const seen = new Set();
    let clicked = 0;
    const hit = el => {{
        if (seen.has(el)) return;
        if (SPARE_DIALOGS && el.closest(DIALOG)) return;
        seen.add(el);
        try {{ el.click(); clicked++; }} catch (e) {{}}
    }};
    for (const el of document.querySelectorAll('button, a, [role="button"], div, span')) {{
        const t = label(el);
        if (t && t.length <= 40 && LABELS.some(l => t === l || t.startsWith(l + ' ') || t.endsWith(' ' + l))) hit(el);
    }}
    for (const el of document.querySelectorAll('[aria-label*="close" i], [aria-label*="بستن"], [data-testid*="close" i]')) hit(el);
    return clicked;
}})()
"#
    )
}

/// One scroll step inside the most specific scrollable region.
pub fn scroll_step(step_px: u32) -> String {
    format!(
        r#"
(() => {{
    const scrollable = el => el && el.scrollHeight > el.clientHeight + 4;
    let region = 'document';
    let box = document.querySelector('[class*="Comments__CommentsList"]');
    if (scrollable(box)) {{
        region = 'list';
    }} else {{
        box = null;
        const dialog = document.querySelector('[role="dialog"], [aria-modal="true"], [class*="Modal"]');
        if (dialog) {{
            box = scrollable(dialog) ? dialog : Array.from(dialog.querySelectorAll('*')).find(scrollable) || null;
            if (box) region = 'dialog';
        }}
    }}
    if (!box) box = document.scrollingElement || document.documentElement;
    box.scrollBy(0, {step_px});
    return {{ region, items: document.querySelectorAll('[class*="Item__Container"]').length }};
}})()
"#
    )
}
