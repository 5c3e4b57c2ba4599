use once_cell::sync::Lazy;
use ratatui::style::Color;
use syntect::highlighting;
use syntect::parsing::SyntaxReference;
use syntect::parsing::SyntaxSet;

pub static SYNTAX_SET: Lazy<SyntaxSet> = Lazy::new(SyntaxSet::load_defaults_newlines);

pub struct Syntaxes {}

impl Syntaxes {
    /// Resolves the language attached to a fenced code block, falling back to
    /// plain text.
    pub fn get(name: &str) -> &'static SyntaxReference {
        let name = name.trim();
        if !name.is_empty() {
            if let Some(syntax) = SYNTAX_SET.find_syntax_by_token(name) {
                return syntax;
            }
        }

        return SYNTAX_SET.find_syntax_plain_text();
    }

    pub fn translate_colour(colour: highlighting::Color) -> Option<Color> {
        if colour.a == 0 {
            return None;
        }

        return Some(Color::Rgb(colour.r, colour.g, colour.b));
    }
}
