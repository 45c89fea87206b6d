use crate::util::escape_html;
use std::collections::BTreeMap;

/// Named containers that renderers write into. A page only owns the targets
/// it was built with; writes to any other target are dropped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Target {
    Stats,
    Chart,
    Tooltip,
    SelectionCount,
    LanguageBreakdown,
}

impl Target {
    pub const ALL: [Target; 5] = [
        Target::Stats,
        Target::Chart,
        Target::Tooltip,
        Target::SelectionCount,
        Target::LanguageBreakdown,
    ];

    pub fn id(&self) -> &'static str {
        match self {
            Target::Stats => "stats",
            Target::Chart => "chart",
            Target::Tooltip => "commit-tooltip",
            Target::SelectionCount => "selection-count",
            Target::LanguageBreakdown => "language-breakdown",
        }
    }

    pub fn from_id(id: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|t| t.id() == id.trim_start_matches('#'))
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Slot {
    pub html: String,
    pub hidden: bool,
    pub style: Option<String>,
}

#[derive(Debug, Clone, Default)]
pub struct Page {
    title: String,
    slots: BTreeMap<Target, Slot>,
}

impl Page {
    pub fn new(title: &str) -> Self {
        Self::with_targets(title, &Target::ALL)
    }

    pub fn with_targets(title: &str, targets: &[Target]) -> Self {
        let slots = targets
            .iter()
            .map(|&t| {
                let slot = Slot {
                    hidden: t == Target::Tooltip,
                    ..Slot::default()
                };
                (t, slot)
            })
            .collect();
        Self {
            title: title.to_string(),
            slots,
        }
    }

    pub fn has(&self, target: Target) -> bool {
        self.slots.contains_key(&target)
    }

    pub fn get(&self, target: Target) -> Option<&Slot> {
        self.slots.get(&target)
    }

    /// Replace the target's markup. Returns false if the page has no such target.
    pub fn set(&mut self, target: Target, html: impl Into<String>) -> bool {
        match self.slots.get_mut(&target) {
            Some(slot) => {
                slot.html = html.into();
                true
            }
            None => false,
        }
    }

    pub fn set_text(&mut self, target: Target, text: &str) -> bool {
        self.set(target, escape_html(text))
    }

    pub fn append(&mut self, target: Target, html: &str) -> bool {
        match self.slots.get_mut(&target) {
            Some(slot) => {
                slot.html.push_str(html);
                true
            }
            None => false,
        }
    }

    pub fn clear(&mut self, target: Target) -> bool {
        self.set(target, String::new())
    }

    pub fn set_hidden(&mut self, target: Target, hidden: bool) {
        if let Some(slot) = self.slots.get_mut(&target) {
            slot.hidden = hidden;
        }
    }

    pub fn set_style(&mut self, target: Target, style: Option<String>) {
        if let Some(slot) = self.slots.get_mut(&target) {
            slot.style = style;
        }
    }

    /// Standalone HTML document containing every target this page owns.
    pub fn to_html(&self) -> String {
        let mut body = String::new();
        body.push_str(&format!("<h1>{}</h1>\n", escape_html(&self.title)));
        for (target, slot) in &self.slots {
            let hidden = if slot.hidden { " hidden" } else { "" };
            let style = slot
                .style
                .as_deref()
                .map(|s| format!(" style=\"{}\"", escape_html(s)))
                .unwrap_or_default();
            body.push_str(&format!(
                "<div id=\"{}\"{hidden}{style}>{}</div>\n",
                target.id(),
                slot.html
            ));
        }

        format!(
            r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>{title}</title>
    <style>{css}</style>
</head>
<body>
{body}</body>
</html>
"#,
            title = escape_html(&self.title),
            css = inline_css(),
        )
    }
}

pub(crate) fn inline_css() -> &'static str {
    r#"
body { font-family: system-ui, sans-serif; max-width: 1100px; margin: 2rem auto; padding: 0 1rem; }
.summary-grid { display: grid; grid-template-columns: repeat(6, 1fr); gap: 0.25rem 1rem; }
.summary-label { font-size: 0.75rem; color: #666; grid-row: 1; }
.summary-value { font-size: 1.75rem; margin: 0; grid-row: 2; }
#chart svg { width: 100%; height: auto; }
#commit-tooltip { position: fixed; background: #fff; border: 1px solid #ccc; border-radius: 6px; padding: 0.5rem 0.75rem; box-shadow: 0 2px 8px rgba(0,0,0,0.15); }
#commit-tooltip dl { display: grid; grid-template-columns: auto 1fr; gap: 0.25rem 0.75rem; margin: 0; }
.lang-grid { display: flex; gap: 1.5rem; }
.lang-name { font-weight: 600; }
"#
}
