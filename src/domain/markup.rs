#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EscapeRule {
    Prefix,
    Delete,
}

/// Single-pass character escaper driven by a fixed rule table.
#[derive(Debug, Clone, Copy)]
pub struct MarkupEscaper {
    marker: char,
    rules: &'static [(char, EscapeRule)],
}

/// Telegram MarkdownV2 as the bot has always sent it: underscores are
/// dropped rather than escaped.
pub const TELEGRAM_MARKDOWN_V2: MarkupEscaper = MarkupEscaper {
    marker: '\\',
    rules: &[
        ('.', EscapeRule::Prefix),
        ('-', EscapeRule::Prefix),
        ('(', EscapeRule::Prefix),
        (')', EscapeRule::Prefix),
        ('[', EscapeRule::Prefix),
        (']', EscapeRule::Prefix),
        ('{', EscapeRule::Prefix),
        ('}', EscapeRule::Prefix),
        ('=', EscapeRule::Prefix),
        ('_', EscapeRule::Delete),
    ],
};

impl MarkupEscaper {
    pub fn escape(&self, text: &str) -> String {
        let mut escaped = String::with_capacity(text.len() + text.len() / 4);
        for ch in text.chars() {
            match self.rule_for(ch) {
                Some(EscapeRule::Prefix) => {
                    escaped.push(self.marker);
                    escaped.push(ch);
                }
                Some(EscapeRule::Delete) => {}
                None => escaped.push(ch),
            }
        }
        escaped
    }

    fn rule_for(&self, ch: char) -> Option<EscapeRule> {
        self.rules
            .iter()
            .find(|(candidate, _)| *candidate == ch)
            .map(|(_, rule)| *rule)
    }
}
